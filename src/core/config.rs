use crate::core::config_validation::{
    parse_run_duration, parse_sleep_duration_us, parse_until_time, parse_wakeup_mask_mode,
    parse_wakeup_pin_mode, ValidationError, UNSET_PIN,
};
use crate::core::run_policy::RunDuration;
use crate::core::wake_time::WakeTime;
use crate::power::wakeup::{MaskWakeupMode, WakeupPinMode};

/// アプリケーション設定
///
/// この構造体はビルド時に`build.rs`によって`cfg.toml`ファイルから
/// 読み込まれた設定を保持します。
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
#[toml_cfg::toml_config]
pub struct Config {
    #[default(0)]
    sleep_duration_ms: u64,

    #[default(4294967295)]
    run_duration_ms: u32,

    #[default(4294967295)]
    run_duration_default_ms: u32,

    #[default(4294967295)]
    run_duration_touch_ms: u32,

    #[default(4294967295)]
    run_duration_gpio_ms: u32,

    #[default(255)]
    wakeup_pin: u8,

    #[default(false)]
    wakeup_pin_inverted: bool,

    #[default("ignore")]
    wakeup_pin_mode: &'static str,

    #[default(0)]
    wakeup_mask: u64,

    #[default("any_high")]
    wakeup_mask_mode: &'static str,

    #[default(false)]
    touch_wakeup: bool,

    #[default(255)]
    until_hour: u8,

    #[default(255)]
    until_minute: u8,

    #[default(255)]
    until_second: u8,

    #[default("Asia/Tokyo")]
    timezone: &'static str,
}

/// 設定エラー
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("稼働時間はフラット値と原因別マッピングを同時に指定できません")]
    RunDurationConflict,
    #[error("原因別の稼働時間には default が必要です")]
    MissingDefaultRunDuration,
    #[error("無効な wakeup_pin_mode: {0}")]
    InvalidWakeupPinMode(String),
    #[error("無効な wakeup_mask_mode: {0}")]
    InvalidWakeupMaskMode(String),
    #[error("無効な時刻指定: {hour:02}:{minute:02}:{second:02}")]
    InvalidUntilTime { hour: u8, minute: u8, second: u8 },
    #[error("時刻指定には until_hour が必要です")]
    IncompleteUntilTime,
}

impl From<ValidationError> for ConfigError {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::RunDurationConflict => ConfigError::RunDurationConflict,
            ValidationError::MissingDefaultRunDuration => ConfigError::MissingDefaultRunDuration,
            ValidationError::InvalidWakeupPinMode(mode) => ConfigError::InvalidWakeupPinMode(mode),
            ValidationError::InvalidWakeupMaskMode(mode) => {
                ConfigError::InvalidWakeupMaskMode(mode)
            }
            ValidationError::InvalidUntilTime {
                hour,
                minute,
                second,
            } => ConfigError::InvalidUntilTime {
                hour,
                minute,
                second,
            },
            ValidationError::IncompleteUntilTime => ConfigError::IncompleteUntilTime,
        }
    }
}

/// ウェイクアップピン設定。ウェイクレベルは !inverted で求める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeupPinConfig {
    pub pin: i32,
    pub inverted: bool,
    pub mode: WakeupPinMode,
}

/// toml_cfg が生成する定数と同じ形の素の設定値。
/// ホストテストではこの形で直接組み立てる。
#[derive(Debug, Clone, Copy)]
pub struct RawConfig {
    pub sleep_duration_ms: u64,
    pub run_duration_ms: u32,
    pub run_duration_default_ms: u32,
    pub run_duration_touch_ms: u32,
    pub run_duration_gpio_ms: u32,
    pub wakeup_pin: u8,
    pub wakeup_pin_inverted: bool,
    pub wakeup_pin_mode: &'static str,
    pub wakeup_mask: u64,
    pub wakeup_mask_mode: &'static str,
    pub touch_wakeup: bool,
    pub until_hour: u8,
    pub until_minute: u8,
    pub until_second: u8,
    pub timezone: &'static str,
}

/// 検証済みのアプリケーション設定
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// タイマーウェイクアップまでの時間 (マイクロ秒)。None なら外部要因でのみ復帰。
    pub sleep_duration_us: Option<u64>,

    /// 起床後の稼働時間。None なら自動スリープしない。
    pub run_duration: Option<RunDuration>,

    /// ウェイクアップピン
    pub wakeup_pin: Option<WakeupPinConfig>,

    /// EXT1 ビットマップウェイクアップ
    pub wakeup_mask: Option<(u64, MaskWakeupMode)>,

    /// タッチウェイクアップ
    pub touch_wakeup: bool,

    /// 時刻指定スリープのターゲット時刻
    pub until: Option<WakeTime>,

    /// タイムゾーン
    pub timezone: String,
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    #[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
    pub fn load() -> Result<Self, ConfigError> {
        // toml_cfg によって生成された定数
        let config = CONFIG;

        Self::from_raw(RawConfig {
            sleep_duration_ms: config.sleep_duration_ms,
            run_duration_ms: config.run_duration_ms,
            run_duration_default_ms: config.run_duration_default_ms,
            run_duration_touch_ms: config.run_duration_touch_ms,
            run_duration_gpio_ms: config.run_duration_gpio_ms,
            wakeup_pin: config.wakeup_pin,
            wakeup_pin_inverted: config.wakeup_pin_inverted,
            wakeup_pin_mode: config.wakeup_pin_mode,
            wakeup_mask: config.wakeup_mask,
            wakeup_mask_mode: config.wakeup_mask_mode,
            touch_wakeup: config.touch_wakeup,
            until_hour: config.until_hour,
            until_minute: config.until_minute,
            until_second: config.until_second,
            timezone: config.timezone,
        })
    }

    /// 素の設定値を検証して組み立てる。不正な組み合わせは実行時ではなく
    /// ここで拒否される。
    pub fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let sleep_duration_us = parse_sleep_duration_us(raw.sleep_duration_ms);

        let run_duration = parse_run_duration(
            raw.run_duration_ms,
            raw.run_duration_default_ms,
            raw.run_duration_touch_ms,
            raw.run_duration_gpio_ms,
        )?;

        let wakeup_pin = if raw.wakeup_pin == UNSET_PIN {
            None
        } else {
            Some(WakeupPinConfig {
                pin: raw.wakeup_pin as i32,
                inverted: raw.wakeup_pin_inverted,
                mode: parse_wakeup_pin_mode(raw.wakeup_pin_mode)?,
            })
        };

        let wakeup_mask = if raw.wakeup_mask == 0 {
            None
        } else {
            Some((raw.wakeup_mask, parse_wakeup_mask_mode(raw.wakeup_mask_mode)?))
        };

        let until = parse_until_time(raw.until_hour, raw.until_minute, raw.until_second)?;

        Ok(AppConfig {
            sleep_duration_us,
            run_duration,
            wakeup_pin,
            wakeup_mask,
            touch_wakeup: raw.touch_wakeup,
            until,
            timezone: raw.timezone.to_string(),
        })
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::core::config_validation::{UNSET_MS, UNSET_TIME};

    fn raw_defaults() -> RawConfig {
        RawConfig {
            sleep_duration_ms: 0,
            run_duration_ms: UNSET_MS,
            run_duration_default_ms: UNSET_MS,
            run_duration_touch_ms: UNSET_MS,
            run_duration_gpio_ms: UNSET_MS,
            wakeup_pin: UNSET_PIN,
            wakeup_pin_inverted: false,
            wakeup_pin_mode: "ignore",
            wakeup_mask: 0,
            wakeup_mask_mode: "any_high",
            touch_wakeup: false,
            until_hour: UNSET_TIME,
            until_minute: UNSET_TIME,
            until_second: UNSET_TIME,
            timezone: "Asia/Tokyo",
        }
    }

    #[test]
    fn test_defaults_produce_inert_config() {
        let config = AppConfig::from_raw(raw_defaults()).unwrap();
        assert_eq!(config.sleep_duration_us, None);
        assert_eq!(config.run_duration, None);
        assert_eq!(config.wakeup_pin, None);
        assert_eq!(config.wakeup_mask, None);
        assert!(!config.touch_wakeup);
        assert_eq!(config.until, None);
    }

    #[test]
    fn test_sleep_duration_stored_in_microseconds() {
        let config = AppConfig::from_raw(RawConfig {
            sleep_duration_ms: 600_000,
            ..raw_defaults()
        })
        .unwrap();
        assert_eq!(config.sleep_duration_us, Some(600_000_000));
    }

    #[test]
    fn test_conflicting_run_durations_rejected_at_load() {
        let result = AppConfig::from_raw(RawConfig {
            run_duration_ms: 10_000,
            run_duration_default_ms: 60_000,
            ..raw_defaults()
        });
        assert!(matches!(result, Err(ConfigError::RunDurationConflict)));
    }

    #[test]
    fn test_wakeup_pin_parsing() {
        let config = AppConfig::from_raw(RawConfig {
            wakeup_pin: 4,
            wakeup_pin_inverted: true,
            wakeup_pin_mode: "keep_awake",
            ..raw_defaults()
        })
        .unwrap();
        assert_eq!(
            config.wakeup_pin,
            Some(WakeupPinConfig {
                pin: 4,
                inverted: true,
                mode: WakeupPinMode::KeepAwake,
            })
        );
    }

    #[test]
    fn test_invalid_pin_mode_rejected() {
        let result = AppConfig::from_raw(RawConfig {
            wakeup_pin: 4,
            wakeup_pin_mode: "hold",
            ..raw_defaults()
        });
        assert!(matches!(result, Err(ConfigError::InvalidWakeupPinMode(_))));
    }

    #[test]
    fn test_mask_and_until_parsing() {
        let config = AppConfig::from_raw(RawConfig {
            wakeup_mask: 0b1100,
            wakeup_mask_mode: "all_low",
            until_hour: 8,
            until_minute: 30,
            until_second: 0,
            ..raw_defaults()
        })
        .unwrap();
        assert_eq!(config.wakeup_mask, Some((0b1100, MaskWakeupMode::AllLow)));
        assert_eq!(
            config.until,
            Some(WakeTime {
                hour: 8,
                minute: 30,
                second: 0,
            })
        );
    }
}
