// Injection gate - tells the listener when observed key events are our own
//
// The listener opens the gate before queueing a job, so suppression starts
// before the first synthetic event can reach the hook.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Default quiet period after a job finishes
pub const DEFAULT_SETTLE_MS: u64 = 50;

#[derive(Debug)]
pub struct InjectionGate {
    pending: AtomicUsize,
    settle: Duration,
    quiet_until: Mutex<Option<Instant>>,
}

impl InjectionGate {
    pub fn new(settle: Duration) -> Self {
        Self {
            pending: AtomicUsize::new(0),
            settle,
            quiet_until: Mutex::new(None),
        }
    }

    /// Mark one injection job as outstanding
    pub fn begin(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    /// Mark one job finished and start the settle period
    pub fn end(&self) {
        *self.quiet_until.lock() = Some(Instant::now() + self.settle);
        let _ = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// True while jobs are outstanding or the settle period has not elapsed
    pub fn is_suppressed(&self) -> bool {
        if self.pending.load(Ordering::SeqCst) > 0 {
            return true;
        }
        matches!(*self.quiet_until.lock(), Some(deadline) if Instant::now() < deadline)
    }
}

impl Default for InjectionGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SETTLE_MS))
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
