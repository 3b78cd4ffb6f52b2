//! Single-flight guard for "load more".

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag that admits at most one load-more operation at a time.
///
/// Clones share the same flag, so a host can hand a clone to an async task
/// while the `Masonry` instance stays behind a lock.
#[derive(Debug, Clone, Default)]
pub struct LoadGate {
    loading: Arc<AtomicBool>,
}

impl LoadGate {
    /// An open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the gate. `None` if a load is already in flight.
    pub fn try_begin(&self) -> Option<LoadGuard> {
        self.loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard {
                loading: Arc::clone(&self.loading),
            })
    }

    /// True while a guard is held.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Run `load` while holding the gate.
    ///
    /// Returns `None` without polling `load` if another load is in flight.
    /// The gate is released when `load` completes, fails, panics or is
    /// dropped mid-flight.
    pub async fn run<F>(&self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        let _guard = self.try_begin()?;
        Some(load.await)
    }
}

/// Held while a load-more is in flight; dropping it reopens the gate.
#[derive(Debug)]
#[must_use = "dropping the guard immediately reopens the gate"]
pub struct LoadGuard {
    loading: Arc<AtomicBool>,
}

impl Drop for LoadGuard {
    fn drop(&mut self) {
        self.loading.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_held() {
        let gate = LoadGate::new();
        let guard = gate.try_begin();
        assert!(guard.is_some());
        assert!(gate.is_loading());
        assert!(gate.try_begin().is_none());

        drop(guard);
        assert!(!gate.is_loading());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn clones_share_the_flag() {
        let gate = LoadGate::new();
        let other = gate.clone();
        let _guard = gate.try_begin().unwrap();
        assert!(other.is_loading());
        assert!(other.try_begin().is_none());
    }

    #[test]
    fn run_releases_gate_after_success() {
        let gate = LoadGate::new();
        let result = pollster::block_on(gate.run(async { 7 }));
        assert_eq!(result, Some(7));
        assert!(!gate.is_loading());
    }

    #[test]
    fn run_releases_gate_after_failure() {
        let gate = LoadGate::new();
        let result: Option<Result<(), String>> =
            pollster::block_on(gate.run(async { Err("network down".to_string()) }));
        assert_eq!(result, Some(Err("network down".to_string())));
        assert!(!gate.is_loading());
    }

    #[test]
    fn run_is_skipped_while_loading() {
        let gate = LoadGate::new();
        let _guard = gate.try_begin().unwrap();
        let mut polled = false;
        let result = pollster::block_on(gate.run(async {
            polled = true;
        }));
        assert_eq!(result, None);
        assert!(!polled);
    }

    #[test]
    fn run_releases_gate_on_panic() {
        let gate = LoadGate::new();
        let inner = gate.clone();
        let outcome = std::panic::catch_unwind(move || {
            pollster::block_on(inner.run(async { panic!("loader exploded") }))
        });
        assert!(outcome.is_err());
        assert!(!gate.is_loading());
    }
}
