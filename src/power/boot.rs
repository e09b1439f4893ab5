use log::{info, warn};

use crate::core::run_policy::WakeCause;

/// RTCメモリエリア（Deep Sleep中も保持される特殊なRAM）に起動回数を保持します。
/// #[link_section = ".rtc.data"] により、通常のRAMではなくRTC RAMに配置されます。
#[link_section = ".rtc.data"]
static mut RTC_BOOT_COUNT: u32 = 0;

/// 起動診断モジュール
pub struct BootTracker;

impl BootTracker {
    /// リセット理由を記録し、起動カウンタを更新して直近のウェイクアップ原因を返す
    pub fn record_boot() -> WakeCause {
        let cause = Self::wake_cause();
        let reset_reason = unsafe { esp_idf_sys::esp_reset_reason() };

        unsafe {
            if reset_reason == esp_idf_sys::esp_reset_reason_t_ESP_RST_DEEPSLEEP {
                RTC_BOOT_COUNT += 1;
                info!(
                    "Deep Sleepからの復帰です (起動 {} 回目, 原因: {:?})",
                    RTC_BOOT_COUNT, cause
                );
            } else {
                // 電源投入やパニックなどスリープ以外のリセット
                RTC_BOOT_COUNT = 1;
                warn!("非Deep Sleep起動です (reset reason: {})", reset_reason);
            }
        }

        cause
    }

    /// 直近のウェイクアップ原因
    pub fn wake_cause() -> WakeCause {
        let cause = unsafe { esp_idf_sys::esp_sleep_get_wakeup_cause() };
        match cause {
            esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_TIMER => WakeCause::Timer,
            esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT0
            | esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_EXT1
            | esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_GPIO => WakeCause::Gpio,
            esp_idf_sys::esp_sleep_source_t_ESP_SLEEP_WAKEUP_TOUCHPAD => WakeCause::Touch,
            _ => WakeCause::Other,
        }
    }

    /// 現在の有効な起動回数を取得
    pub fn boot_count() -> u32 {
        unsafe { RTC_BOOT_COUNT }
    }
}
