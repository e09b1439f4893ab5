/// 電源管理モジュール
#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub mod boot;
pub mod platform;
pub mod wakeup;

#[cfg(any(target_arch = "riscv32", target_arch = "xtensa"))]
pub use boot::BootTracker;
pub use platform::*;
pub use wakeup::*;
