use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 「このビルドに Deep Sleep 管理が存在するか」を他コンポーネントへ公開するハンドル。
/// setup 時に一度だけ有効化され、以後クリアされない。
#[derive(Debug, Clone, Default)]
pub struct DeepSleepPresence(Arc<AtomicBool>);

impl DeepSleepPresence {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark_active(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_starts_inactive_and_latches() {
        let presence = DeepSleepPresence::new();
        let observer = presence.clone();
        assert!(!observer.is_active());

        presence.mark_active();
        assert!(observer.is_active());

        presence.mark_active();
        assert!(observer.is_active());
    }
}
