use log::warn;

use crate::core::controller::DeepSleepController;
use crate::core::wake_time::{TimeSource, WakeTime};
use crate::power::platform::DeepSleepPlatform;

/// オートメーション層から呼び出されるコマンド群。
/// コントローラーへの参照を受け取る素のコマンドオブジェクトで、
/// 継承階層は持たない。

/// Deep Sleep を明示的に開始する。時間指定と時刻指定のどちらも無ければ
/// 設定済みのスリープ時間で突入する。両方あれば時刻指定を優先する。
#[derive(Debug, Clone, Copy, Default)]
pub struct EnterDeepSleepAction {
    pub duration_ms: Option<u64>,
    pub until: Option<WakeTime>,
}

impl EnterDeepSleepAction {
    pub fn run<P: DeepSleepPlatform>(
        &self,
        controller: &mut DeepSleepController<P>,
        time_source: Option<&dyn TimeSource>,
    ) {
        match (self.until, time_source) {
            (Some(target), Some(time_source)) => {
                controller.enter_deep_sleep_until(target, time_source);
            }
            (Some(_), None) => {
                warn!("時刻指定がありますが時刻ソースが未設定です。時間指定へフォールバックします");
                controller.enter_deep_sleep(self.duration_ms);
            }
            _ => controller.enter_deep_sleep(self.duration_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PreventDeepSleepAction;

impl PreventDeepSleepAction {
    pub fn run<P: DeepSleepPlatform>(&self, controller: &mut DeepSleepController<P>) {
        controller.prevent_deep_sleep();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllowDeepSleepAction;

impl AllowDeepSleepAction {
    pub fn run<P: DeepSleepPlatform>(&self, controller: &mut DeepSleepController<P>) {
        controller.allow_deep_sleep();
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::power::wakeup::{MaskWakeupMode, WakeupSources};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingPlatform {
        sleeps: Arc<Mutex<u32>>,
        timer_us: Arc<Mutex<Option<u64>>>,
    }

    impl DeepSleepPlatform for CountingPlatform {
        fn enable_timer_wakeup(&self, duration_us: u64) {
            *self.timer_us.lock().unwrap() = Some(duration_us);
        }
        fn enable_pin_wakeup(&self, _pin: i32, _level: bool) {}
        fn enable_mask_wakeup(&self, _mask: u64, _mode: MaskWakeupMode) {}
        fn enable_touch_wakeup(&self) {}
        fn enter_sleep(&self) {
            *self.sleeps.lock().unwrap() += 1;
        }
    }

    fn controller(platform: CountingPlatform) -> DeepSleepController<CountingPlatform> {
        DeepSleepController::new(platform, WakeupSources::new(), None, None)
    }

    #[test]
    fn test_enter_action_with_explicit_duration() {
        let platform = CountingPlatform::default();
        let mut controller = controller(platform.clone());

        EnterDeepSleepAction {
            duration_ms: Some(1_500),
            until: None,
        }
        .run(&mut controller, None);

        assert_eq!(*platform.sleeps.lock().unwrap(), 1);
        assert_eq!(*platform.timer_us.lock().unwrap(), Some(1_500_000));
    }

    #[test]
    fn test_enter_action_bypasses_prevent() {
        let platform = CountingPlatform::default();
        let mut controller = controller(platform.clone());

        PreventDeepSleepAction.run(&mut controller);
        EnterDeepSleepAction::default().run(&mut controller, None);

        assert_eq!(*platform.sleeps.lock().unwrap(), 1);
    }

    #[test]
    fn test_prevent_and_allow_actions_toggle_flag() {
        let platform = CountingPlatform::default();
        let mut controller = controller(platform);

        PreventDeepSleepAction.run(&mut controller);
        assert!(controller.is_prevented());
        AllowDeepSleepAction.run(&mut controller);
        assert!(!controller.is_prevented());
    }
}
