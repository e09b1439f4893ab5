use std::time::{Duration, Instant};

use log::{info, warn};

use crate::core::lifecycle::{LifecycleHooks, TEARDOWN_TIMEOUT};
use crate::core::presence::DeepSleepPresence;
use crate::core::run_policy::{RunDuration, WakeCause};
use crate::core::wake_time::{millis_until, TimeSource, WakeTime};
use crate::power::platform::DeepSleepPlatform;
use crate::power::wakeup::WakeupSources;

/// スケジューラの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// 通常稼働中
    Running,
    /// スリープ要求が抑止により保留中 (毎ティック再試行される)
    SleepDeferred,
    /// スリープ突入シーケンス実行中 (実機ではここから戻らない)
    EnteringSleep,
}

/// Deep Sleep ライフサイクルの状態機械。
/// 自動突入のスケジュール、手動トリガー、抑止/許可、突入シーケンスの
/// 実行順 (shutdown フック → コンポーネント解体 → powerdown フック →
/// バックエンド呼び出し) を管理する。
pub struct DeepSleepController<P: DeepSleepPlatform> {
    platform: P,
    wakeup: WakeupSources,
    hooks: LifecycleHooks,
    presence: DeepSleepPresence,
    sleep_duration_us: Option<u64>,
    run_duration: Option<RunDuration>,
    state: ControllerState,
    prevent: bool,
    sleep_deadline: Option<Instant>,
}

impl<P: DeepSleepPlatform> DeepSleepController<P> {
    pub fn new(
        platform: P,
        wakeup: WakeupSources,
        sleep_duration_us: Option<u64>,
        run_duration: Option<RunDuration>,
    ) -> Self {
        Self {
            platform,
            wakeup,
            hooks: LifecycleHooks::new(),
            presence: DeepSleepPresence::new(),
            sleep_duration_us,
            run_duration,
            state: ControllerState::Running,
            prevent: false,
            sleep_deadline: None,
        }
    }

    /// 起動時の初期化。稼働時間が設定されていれば、起床原因に応じた
    /// 時間経過後に自動スリープを予約する (唯一の自動突入経路)。
    pub fn setup(&mut self, wake_cause: WakeCause, now: Instant) {
        self.presence.mark_active();
        self.log_config();

        if let Some(run) = self.run_duration.as_ref() {
            let run_ms = run.resolve(wake_cause);
            info!(
                "起床原因 {:?}: {} ms 稼働後に自動スリープします",
                wake_cause, run_ms
            );
            self.sleep_deadline = Some(now + Duration::from_millis(run_ms as u64));
        }
    }

    fn log_config(&self) {
        info!("Deep Sleep 設定:");
        if let Some(us) = self.sleep_duration_us {
            info!("  スリープ時間: {} ms", us / 1000);
        }
        self.wakeup.log_config();
    }

    /// 協調ティック。予約時刻の到来か保留中の再試行で、1ティックにつき
    /// 最大1回だけ物理的な突入を試みる。
    pub fn tick(&mut self, now: Instant) {
        if self.sleep_deadline.is_some_and(|deadline| now >= deadline) {
            self.sleep_deadline = None;
            self.begin_sleep(false);
        } else if self.state == ControllerState::SleepDeferred {
            self.begin_sleep(false);
        }
    }

    /// スリープ突入を試みる。manual = true は抑止フラグを無視する
    /// (明示的な操作要求は内部の「起きていたい」より優先される)。
    pub fn begin_sleep(&mut self, manual: bool) {
        if self.prevent && !manual {
            if self.state != ControllerState::SleepDeferred {
                info!("スリープは抑止中です。許可され次第、再試行します");
                self.state = ControllerState::SleepDeferred;
            }
            return;
        }

        let program = match self.wakeup.prepare_for_sleep() {
            Ok(program) => program,
            Err(e) => {
                // 衝突未解決。再トリガーは呼び出し側の責任。
                warn!("スリープ突入を中止します: {}", e);
                self.state = ControllerState::Running;
                return;
            }
        };

        info!("Beginning deep sleep");
        self.state = ControllerState::EnteringSleep;

        self.hooks.run_shutdown_hooks();
        self.hooks.teardown_components(TEARDOWN_TIMEOUT);
        self.hooks.run_powerdown_hooks();

        if let Some(us) = self.sleep_duration_us {
            self.platform.enable_timer_wakeup(us);
        }
        program.apply(&self.platform);
        self.platform.enter_sleep();
    }

    /// 自動・プログラム的なスリープ要求を保留させる。冪等。
    pub fn prevent_deep_sleep(&mut self) {
        self.prevent = true;
    }

    /// 抑止を解除する。保留中の要求は次のティックで再試行される。冪等。
    pub fn allow_deep_sleep(&mut self) {
        self.prevent = false;
    }

    /// 明示的なスリープ要求。時間指定があれば設定を上書きする。
    pub fn enter_deep_sleep(&mut self, duration_ms: Option<u64>) {
        if let Some(ms) = duration_ms {
            self.set_sleep_duration(ms);
        }
        self.begin_sleep(true);
    }

    /// 指定時刻までスリープする。時刻が過ぎていれば翌日扱い。
    /// 時刻が取得できない場合は設定済みのスリープ時間のまま突入する。
    pub fn enter_deep_sleep_until(&mut self, target: WakeTime, time_source: &dyn TimeSource) {
        match time_source.now() {
            Some(now) => {
                let ms = millis_until(now.time(), target);
                info!(
                    "{:02}:{:02}:{:02} まで {} ms スリープします",
                    target.hour, target.minute, target.second, ms
                );
                self.set_sleep_duration(ms);
            }
            None => {
                warn!("現在時刻が取得できません。設定済みのスリープ時間を使用します");
            }
        }
        self.begin_sleep(true);
    }

    pub fn set_sleep_duration(&mut self, duration_ms: u64) {
        self.sleep_duration_us = Some(duration_ms.saturating_mul(1000));
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_prevented(&self) -> bool {
        self.prevent
    }

    pub fn sleep_duration_us(&self) -> Option<u64> {
        self.sleep_duration_us
    }

    /// 他コンポーネント向けの存在フラグハンドル
    pub fn presence(&self) -> DeepSleepPresence {
        self.presence.clone()
    }

    pub fn hooks_mut(&mut self) -> &mut LifecycleHooks {
        &mut self.hooks
    }

    pub fn wakeup_mut(&mut self) -> &mut WakeupSources {
        &mut self.wakeup
    }
}
