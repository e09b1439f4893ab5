use chrono::{NaiveDateTime, Timelike};

/// 時刻指定スリープのターゲット時刻 (ローカル時刻)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// 絶対時刻の計算にのみ使う時刻ソース
pub trait TimeSource {
    /// 現在のローカル時刻。まだ時刻同期できていなければ None。
    fn now(&self) -> Option<NaiveDateTime>;
}

/// システムクロックをタイムゾーン付きで読む時刻ソース
pub struct SystemTimeSource {
    timezone: chrono_tz::Tz,
}

impl SystemTimeSource {
    pub fn new(timezone: chrono_tz::Tz) -> Self {
        Self { timezone }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Option<NaiveDateTime> {
        Some(chrono::Utc::now().with_timezone(&self.timezone).naive_local())
    }
}

/// target 時刻までのミリ秒数。既に過ぎていれば翌日の同時刻まで繰り越す。
pub fn millis_until(now: chrono::NaiveTime, target: WakeTime) -> u64 {
    const DAY_MS: u64 = 24 * 60 * 60 * 1000;

    let now_ms =
        now.num_seconds_from_midnight() as u64 * 1000 + (now.nanosecond() / 1_000_000) as u64;
    let target_ms =
        (target.hour as u64 * 3600 + target.minute as u64 * 60 + target.second as u64) * 1000;

    if target_ms <= now_ms {
        target_ms + DAY_MS - now_ms
    } else {
        target_ms - now_ms
    }
}
