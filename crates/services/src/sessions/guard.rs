use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;

/// Teardown discipline for one running session.
///
/// The flag is set exactly once, before any underlying resource is
/// cancelled, and never unset. Every asynchronous continuation checks
/// [`LifecycleGuard::is_tearing_down`] before mutating state or firing a
/// side effect, so a continuation that was already scheduled when teardown
/// began still refuses to run.
pub(crate) struct LifecycleGuard {
    tearing_down: AtomicBool,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl LifecycleGuard {
    pub(crate) fn new() -> Self {
        Self {
            tearing_down: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn is_tearing_down(&self) -> bool {
        self.tearing_down.load(Ordering::SeqCst)
    }

    /// Track a spawned task so teardown can abort it.
    ///
    /// Tasks registered after teardown began are aborted immediately.
    pub(crate) fn register(&self, handle: JoinHandle<()>) {
        if self.is_tearing_down() {
            handle.abort();
            return;
        }
        if let Ok(mut guard) = self.tasks.lock() {
            guard.retain(|task| !task.is_finished());
            guard.push(handle);
        }
    }

    /// Set the teardown flag, then abort every tracked task.
    ///
    /// Returns false if teardown had already begun.
    pub(crate) fn begin_teardown(&self) -> bool {
        if self.tearing_down.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Ok(mut guard) = self.tasks.lock() {
            for task in guard.drain(..) {
                task.abort();
            }
        }
        true
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.begin_teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teardown_is_idempotent() {
        let guard = LifecycleGuard::new();
        assert!(!guard.is_tearing_down());
        assert!(guard.begin_teardown());
        assert!(guard.is_tearing_down());
        assert!(!guard.begin_teardown());
        assert!(guard.is_tearing_down());
    }

    #[tokio::test]
    async fn registration_after_teardown_aborts_immediately() {
        let guard = LifecycleGuard::new();
        guard.begin_teardown();

        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let abort_probe = handle.abort_handle();
        guard.register(handle);

        for _ in 0..10 {
            if abort_probe.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort_probe.is_finished());
    }

    #[tokio::test]
    async fn teardown_aborts_tracked_tasks() {
        let guard = LifecycleGuard::new();
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        });
        let abort_probe = handle.abort_handle();
        guard.register(handle);

        guard.begin_teardown();
        for _ in 0..10 {
            if abort_probe.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(abort_probe.is_finished());
    }
}
