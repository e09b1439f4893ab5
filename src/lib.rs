/*!
 * # Deep Sleep Manager Library
 *
 * バッテリー駆動ノードの Deep Sleep ライフサイクルを管理するためのライブラリ
 *
 * ## モジュール構成
 * - `core`: スリープ制御の核となる機能（設定、稼働時間ポリシー、状態機械、フック）
 * - `power`: プラットフォーム抽象（ウェイクアップソース、ESP-IDFバックエンド）
 */

// 公開モジュール
pub mod core;
pub mod power;

// 内部で使用する型をまとめてエクスポート
pub use crate::core::{
    AllowDeepSleepAction, AppConfig, ConfigError, ControllerState, DeepSleepController,
    DeepSleepPresence, EnterDeepSleepAction, LifecycleHooks, PreventDeepSleepAction, RunDuration,
    SystemTimeSource, Teardown, TimeSource, WakeCause, WakeTime,
};
pub use crate::power::{
    DeepSleepPlatform, MaskWakeupMode, StubDeepSleep, WakeupError, WakeupInputPin, WakeupPinMode,
    WakeupProgram, WakeupSources,
};

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
