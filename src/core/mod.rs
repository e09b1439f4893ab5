/// コアシステムモジュール
pub mod actions;
pub mod config;
pub mod config_validation;
pub mod controller;
pub mod lifecycle;
pub mod presence;
pub mod run_policy;
pub mod wake_time;

pub use actions::{AllowDeepSleepAction, EnterDeepSleepAction, PreventDeepSleepAction};
pub use config::{AppConfig, ConfigError, RawConfig, WakeupPinConfig};
pub use controller::{ControllerState, DeepSleepController};
pub use lifecycle::{LifecycleHooks, Teardown, TEARDOWN_TIMEOUT};
pub use presence::DeepSleepPresence;
pub use run_policy::{resolve_run_duration, RunDuration, WakeCause};
pub use wake_time::{millis_until, SystemTimeSource, TimeSource, WakeTime};
