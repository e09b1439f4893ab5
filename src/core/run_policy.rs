/// 直近のウェイクアップ原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// タイマーによる復帰
    Timer,
    /// GPIO (EXT0/EXT1含む) による復帰
    Gpio,
    /// タッチセンサーによる復帰
    Touch,
    /// 電源投入・リセットなどその他
    Other,
}

/// 起床後にスリープへ戻るまでの稼働時間設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunDuration {
    /// 原因によらず一定 (ミリ秒)
    Flat(u32),
    /// ウェイクアップ原因別 (ミリ秒)
    ByCause { default: u32, touch: u32, gpio: u32 },
}

impl RunDuration {
    pub fn resolve(&self, cause: WakeCause) -> u32 {
        match self {
            RunDuration::Flat(ms) => *ms,
            RunDuration::ByCause {
                default,
                touch,
                gpio,
            } => match cause {
                WakeCause::Touch => *touch,
                WakeCause::Gpio => *gpio,
                _ => *default,
            },
        }
    }
}

/// 稼働時間が未設定なら None (自動スリープしない)
pub fn resolve_run_duration(config: Option<&RunDuration>, cause: WakeCause) -> Option<u32> {
    config.map(|duration| duration.resolve(cause))
}
