use crate::core::run_policy::RunDuration;
use crate::core::wake_time::WakeTime;
use crate::power::wakeup::{MaskWakeupMode, WakeupPinMode};

/// u32 フィールドの「未設定」センチネル値
pub const UNSET_MS: u32 = u32::MAX;
/// 時刻フィールドの「未設定」センチネル値
pub const UNSET_TIME: u8 = 255;
/// ピン番号の「未設定」センチネル値
pub const UNSET_PIN: u8 = 255;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    RunDurationConflict,
    MissingDefaultRunDuration,
    InvalidWakeupPinMode(String),
    InvalidWakeupMaskMode(String),
    InvalidUntilTime { hour: u8, minute: u8, second: u8 },
    IncompleteUntilTime,
}

/// ミリ秒設定をマイクロ秒へ変換する。0 はタイマーウェイクアップ無しを意味する。
pub fn parse_sleep_duration_us(sleep_duration_ms: u64) -> Option<u64> {
    if sleep_duration_ms == 0 {
        None
    } else {
        Some(sleep_duration_ms.saturating_mul(1000))
    }
}

/// フラット値と原因別マッピングは排他。両方指定されたら設定時点で拒否する。
pub fn parse_run_duration(
    flat: u32,
    default: u32,
    touch: u32,
    gpio: u32,
) -> Result<Option<RunDuration>, ValidationError> {
    let mapped = default != UNSET_MS || touch != UNSET_MS || gpio != UNSET_MS;

    if flat != UNSET_MS && mapped {
        return Err(ValidationError::RunDurationConflict);
    }
    if flat != UNSET_MS {
        return Ok(Some(RunDuration::Flat(flat)));
    }
    if !mapped {
        return Ok(None);
    }
    if default == UNSET_MS {
        return Err(ValidationError::MissingDefaultRunDuration);
    }

    Ok(Some(RunDuration::ByCause {
        default,
        touch: if touch == UNSET_MS { default } else { touch },
        gpio: if gpio == UNSET_MS { default } else { gpio },
    }))
}

pub fn parse_wakeup_pin_mode(mode: &str) -> Result<WakeupPinMode, ValidationError> {
    match mode {
        "ignore" => Ok(WakeupPinMode::Ignore),
        "keep_awake" => Ok(WakeupPinMode::KeepAwake),
        "invert_wakeup" => Ok(WakeupPinMode::InvertWakeup),
        other => Err(ValidationError::InvalidWakeupPinMode(other.to_string())),
    }
}

pub fn parse_wakeup_mask_mode(mode: &str) -> Result<MaskWakeupMode, ValidationError> {
    match mode {
        "all_low" => Ok(MaskWakeupMode::AllLow),
        "any_high" => Ok(MaskWakeupMode::AnyHigh),
        other => Err(ValidationError::InvalidWakeupMaskMode(other.to_string())),
    }
}

/// hour が未設定なら時刻指定なし。minute / second のみの指定は不完全として拒否する。
pub fn parse_until_time(
    hour: u8,
    minute: u8,
    second: u8,
) -> Result<Option<WakeTime>, ValidationError> {
    if hour == UNSET_TIME {
        if minute != UNSET_TIME || second != UNSET_TIME {
            return Err(ValidationError::IncompleteUntilTime);
        }
        return Ok(None);
    }

    let minute = if minute == UNSET_TIME { 0 } else { minute };
    let second = if second == UNSET_TIME { 0 } else { second };
    if hour >= 24 || minute >= 60 || second >= 60 {
        return Err(ValidationError::InvalidUntilTime {
            hour,
            minute,
            second,
        });
    }

    Ok(Some(WakeTime {
        hour,
        minute,
        second,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_duration_ms_to_us() {
        assert_eq!(parse_sleep_duration_us(600_000), Some(600_000_000));
        assert_eq!(parse_sleep_duration_us(1), Some(1000));
        assert_eq!(parse_sleep_duration_us(0), None);
    }

    #[test]
    fn test_run_duration_unset() {
        let result = parse_run_duration(UNSET_MS, UNSET_MS, UNSET_MS, UNSET_MS);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_run_duration_flat() {
        let result = parse_run_duration(10_000, UNSET_MS, UNSET_MS, UNSET_MS);
        assert_eq!(result, Ok(Some(RunDuration::Flat(10_000))));
    }

    #[test]
    fn test_run_duration_both_forms_rejected() {
        let result = parse_run_duration(10_000, 60_000, UNSET_MS, UNSET_MS);
        assert_eq!(result, Err(ValidationError::RunDurationConflict));

        let result = parse_run_duration(10_000, UNSET_MS, 5_000, UNSET_MS);
        assert_eq!(result, Err(ValidationError::RunDurationConflict));
    }

    #[test]
    fn test_run_duration_mapping_requires_default() {
        let result = parse_run_duration(UNSET_MS, UNSET_MS, 5_000, 1_000);
        assert_eq!(result, Err(ValidationError::MissingDefaultRunDuration));
    }

    #[test]
    fn test_run_duration_partial_mapping_falls_back_to_default() {
        let result = parse_run_duration(UNSET_MS, 60_000, 5_000, UNSET_MS);
        assert_eq!(
            result,
            Ok(Some(RunDuration::ByCause {
                default: 60_000,
                touch: 5_000,
                gpio: 60_000,
            }))
        );
    }

    #[test]
    fn test_wakeup_pin_mode_parsing() {
        assert_eq!(parse_wakeup_pin_mode("ignore"), Ok(WakeupPinMode::Ignore));
        assert_eq!(
            parse_wakeup_pin_mode("keep_awake"),
            Ok(WakeupPinMode::KeepAwake)
        );
        assert_eq!(
            parse_wakeup_pin_mode("invert_wakeup"),
            Ok(WakeupPinMode::InvertWakeup)
        );
        assert!(parse_wakeup_pin_mode("keep-awake").is_err());
    }

    #[test]
    fn test_wakeup_mask_mode_parsing() {
        assert_eq!(parse_wakeup_mask_mode("all_low"), Ok(MaskWakeupMode::AllLow));
        assert_eq!(
            parse_wakeup_mask_mode("any_high"),
            Ok(MaskWakeupMode::AnyHigh)
        );
        assert!(parse_wakeup_mask_mode("edge").is_err());
    }

    #[test]
    fn test_until_time_unset() {
        assert_eq!(parse_until_time(UNSET_TIME, UNSET_TIME, UNSET_TIME), Ok(None));
    }

    #[test]
    fn test_until_time_defaults_minute_and_second() {
        assert_eq!(
            parse_until_time(8, UNSET_TIME, UNSET_TIME),
            Ok(Some(WakeTime {
                hour: 8,
                minute: 0,
                second: 0,
            }))
        );
    }

    #[test]
    fn test_until_time_out_of_range() {
        assert_eq!(
            parse_until_time(24, 0, 0),
            Err(ValidationError::InvalidUntilTime {
                hour: 24,
                minute: 0,
                second: 0,
            })
        );
    }

    #[test]
    fn test_until_time_without_hour_rejected() {
        assert_eq!(
            parse_until_time(UNSET_TIME, 30, UNSET_TIME),
            Err(ValidationError::IncompleteUntilTime)
        );
    }
}
