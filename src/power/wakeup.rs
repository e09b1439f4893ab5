use log::{info, warn};

use crate::power::platform::DeepSleepPlatform;

/// ウェイクアップピンが既にウェイクレベルにある場合の衝突解決モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeupPinMode {
    /// そのままスリープする (即時の空ウェイクアップは許容)
    Ignore,
    /// スリープ突入を中止する
    KeepAwake,
    /// 今回のスリープに限り反対レベルで復帰を待つ
    InvertWakeup,
}

/// ビットマップ (EXT1) ウェイクアップの判定モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskWakeupMode {
    /// マスク内の全ピンが Low になったら復帰
    AllLow,
    /// マスク内のいずれかのピンが High になったら復帰
    AnyHigh,
}

/// Wakeup input pin abstraction. Lets the conflict check read the current
/// level without tying the configurator to a specific HAL.
pub trait WakeupInputPin {
    fn pin(&self) -> i32;
    fn digital_read(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum WakeupError {
    #[error("GPIO{pin} は既にウェイクレベルです。今スリープすると即座に復帰してしまいます")]
    PinAlreadyAtWakeLevel { pin: i32 },
}

struct PinSource {
    pin: Box<dyn WakeupInputPin>,
    wake_level: bool,
    mode: WakeupPinMode,
}

/// 設定済みウェイクアップソースの集合
#[derive(Default)]
pub struct WakeupSources {
    pin: Option<PinSource>,
    mask: Option<(u64, MaskWakeupMode)>,
    touch: bool,
}

impl WakeupSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// wake_level は true = High。反転ピンなら呼び出し側が !inverted を渡す。
    pub fn set_wakeup_pin(
        &mut self,
        pin: Box<dyn WakeupInputPin>,
        wake_level: bool,
        mode: WakeupPinMode,
    ) {
        self.pin = Some(PinSource {
            pin,
            wake_level,
            mode,
        });
    }

    pub fn set_wakeup_mask(&mut self, mask: u64, mode: MaskWakeupMode) {
        self.mask = Some((mask, mode));
    }

    pub fn set_touch_wakeup(&mut self, enabled: bool) {
        self.touch = enabled;
    }

    /// 今回のスリープ突入に使うウェイクアップ設定を確定する。
    /// ピンが既にウェイクレベルの場合はモードに従って解決する。
    /// マスクとタッチには「現在レベル」の概念が無いのでそのまま通す。
    pub fn prepare_for_sleep(&self) -> Result<WakeupProgram, WakeupError> {
        let pin = match &self.pin {
            None => None,
            Some(source) => {
                let mut level = source.wake_level;
                if source.pin.digital_read() == level {
                    match source.mode {
                        WakeupPinMode::Ignore => {}
                        WakeupPinMode::KeepAwake => {
                            return Err(WakeupError::PinAlreadyAtWakeLevel {
                                pin: source.pin.pin(),
                            });
                        }
                        WakeupPinMode::InvertWakeup => {
                            // 保存済み設定は変更せず、今回の書き込みだけ反転する
                            warn!(
                                "GPIO{} が既にウェイクレベルのため、今回は反対レベルで復帰を待ちます",
                                source.pin.pin()
                            );
                            level = !level;
                        }
                    }
                }
                Some((source.pin.pin(), level))
            }
        };

        Ok(WakeupProgram {
            pin,
            mask: self.mask,
            touch: self.touch,
        })
    }

    pub fn log_config(&self) {
        if let Some(source) = &self.pin {
            info!(
                "  ウェイクアップピン: GPIO{} (レベル {}, モード {:?})",
                source.pin.pin(),
                if source.wake_level { "High" } else { "Low" },
                source.mode
            );
        }
        if let Some((mask, mode)) = self.mask {
            info!("  ウェイクアップマスク: {:#x} ({:?})", mask, mode);
        }
        if self.touch {
            info!("  タッチウェイクアップ: 有効");
        }
    }
}

/// 1回のスリープ突入に適用するウェイクアップ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeupProgram {
    pub pin: Option<(i32, bool)>,
    pub mask: Option<(u64, MaskWakeupMode)>,
    pub touch: bool,
}

impl WakeupProgram {
    pub fn apply<P: DeepSleepPlatform>(&self, platform: &P) {
        if let Some((pin, level)) = self.pin {
            platform.enable_pin_wakeup(pin, level);
        }
        if let Some((mask, mode)) = self.mask {
            platform.enable_mask_wakeup(mask, mode);
        }
        if self.touch {
            platform.enable_touch_wakeup();
        }
    }
}
