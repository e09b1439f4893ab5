use std::time::{Duration, Instant};

use log::warn;

/// スリープ突入時のコンポーネント解体に許す時間
pub const TEARDOWN_TIMEOUT: Duration = Duration::from_millis(100);

/// スリープ前に協調的な後片付けが必要なコンポーネント
pub trait Teardown {
    fn name(&self) -> &str;

    /// 片付けを一歩進める。完了していれば true を返す。
    /// 完了後に再度呼ばれた場合も true を返し続けること。
    fn poll_teardown(&mut self) -> bool;
}

type Hook = Box<dyn FnMut()>;

/// スリープ突入シーケンスに外部から登録されるフック群。
/// 実行順は shutdown フック → コンポーネント解体 → powerdown フックで固定。
#[derive(Default)]
pub struct LifecycleHooks {
    shutdown_hooks: Vec<Hook>,
    powerdown_hooks: Vec<Hook>,
    components: Vec<Box<dyn Teardown>>,
}

impl LifecycleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_shutdown(&mut self, hook: impl FnMut() + 'static) {
        self.shutdown_hooks.push(Box::new(hook));
    }

    pub fn on_powerdown(&mut self, hook: impl FnMut() + 'static) {
        self.powerdown_hooks.push(Box::new(hook));
    }

    pub fn register_component(&mut self, component: Box<dyn Teardown>) {
        self.components.push(component);
    }

    pub fn run_shutdown_hooks(&mut self) {
        for hook in self.shutdown_hooks.iter_mut() {
            hook();
        }
    }

    pub fn run_powerdown_hooks(&mut self) {
        for hook in self.powerdown_hooks.iter_mut() {
            hook();
        }
    }

    /// 全コンポーネントの解体を timeout まで繰り返しポーリングする
    pub fn teardown_components(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;

        loop {
            let mut all_done = true;
            for component in self.components.iter_mut() {
                if !component.poll_teardown() {
                    all_done = false;
                }
            }
            if all_done {
                return;
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        for component in self.components.iter_mut() {
            if !component.poll_teardown() {
                warn!("{} の解体がタイムアウトしました", component.name());
            }
        }
    }
}
