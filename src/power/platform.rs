use log::error;
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
use log::info;

use crate::power::wakeup::MaskWakeupMode;

/// Platform-agnostic deep-sleep backend abstraction.
pub trait DeepSleepPlatform {
    /// Arm a timer wakeup after the given duration in microseconds.
    fn enable_timer_wakeup(&self, duration_us: u64);
    /// Arm a single-pin wakeup at the given level (true = High).
    fn enable_pin_wakeup(&self, pin: i32, level: bool);
    /// Arm a bitmapped multi-pin wakeup.
    fn enable_mask_wakeup(&self, mask: u64, mode: MaskWakeupMode);
    /// Arm the touch controller as a wakeup source.
    fn enable_touch_wakeup(&self);
    /// Enter deep sleep. Does not return on real hardware.
    fn enter_sleep(&self);
}

/// ESP-IDF specific deep sleep implementation.
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub struct EspIdfDeepSleep;

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
impl DeepSleepPlatform for EspIdfDeepSleep {
    fn enable_timer_wakeup(&self, duration_us: u64) {
        info!("Enabling timer wakeup after {} microseconds", duration_us);
        unsafe {
            esp_idf_sys::esp_sleep_enable_timer_wakeup(duration_us);
        }
    }

    fn enable_pin_wakeup(&self, pin: i32, level: bool) {
        info!("Enabling EXT0 wakeup on GPIO{} at level {}", pin, level as i32);
        unsafe {
            esp_idf_sys::esp_sleep_enable_ext0_wakeup(pin, level as i32);
        }
    }

    fn enable_mask_wakeup(&self, mask: u64, mode: MaskWakeupMode) {
        info!("Enabling EXT1 wakeup with mask {:#x} ({:?})", mask, mode);
        let mode = match mode {
            MaskWakeupMode::AllLow => {
                esp_idf_sys::esp_sleep_ext1_wakeup_mode_t_ESP_EXT1_WAKEUP_ALL_LOW
            }
            MaskWakeupMode::AnyHigh => {
                esp_idf_sys::esp_sleep_ext1_wakeup_mode_t_ESP_EXT1_WAKEUP_ANY_HIGH
            }
        };
        unsafe {
            esp_idf_sys::esp_sleep_enable_ext1_wakeup(mask, mode);
        }
    }

    fn enable_touch_wakeup(&self) {
        info!("Enabling touchpad wakeup");
        unsafe {
            esp_idf_sys::esp_sleep_enable_touchpad_wakeup();
        }
    }

    fn enter_sleep(&self) {
        info!("---[STARTING DEEP SLEEP]---");
        unsafe {
            esp_idf_sys::esp_deep_sleep_start();

            // 通常、ここは実行されない
            error!("esp_deep_sleep_start() から戻ってしまいました。OS再起動を実行します。");
            esp_idf_sys::esp_restart();
        }
    }
}

/// ESP-IDF specific wakeup pin, read through the raw GPIO level register.
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub struct EspIdfWakeupPin {
    pin: i32,
}

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
impl EspIdfWakeupPin {
    pub fn new(pin: i32) -> Self {
        unsafe {
            esp_idf_sys::gpio_set_direction(pin, esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT);
        }
        Self { pin }
    }
}

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
impl crate::power::wakeup::WakeupInputPin for EspIdfWakeupPin {
    fn pin(&self) -> i32 {
        self.pin
    }

    fn digital_read(&self) -> bool {
        unsafe { esp_idf_sys::gpio_get_level(self.pin) != 0 }
    }
}

/// 対応バックエンドが無いビルド向けのスタブ。
/// フックとteardownの後では戻れる「稼働状態」が残っていないため、
/// enter_sleep はエラーを記録してその場で待機し続ける。
pub struct StubDeepSleep;

impl DeepSleepPlatform for StubDeepSleep {
    fn enable_timer_wakeup(&self, _duration_us: u64) {}

    fn enable_pin_wakeup(&self, _pin: i32, _level: bool) {}

    fn enable_mask_wakeup(&self, _mask: u64, _mode: MaskWakeupMode) {}

    fn enable_touch_wakeup(&self) {}

    fn enter_sleep(&self) {
        error!("Deep sleep is not supported on this platform; idling instead");
        loop {
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
    }
}
