use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters tracking dispatch outcomes.
///
/// All counters use relaxed ordering. For a consistent point-in-time
/// view, call [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total number of dispatch calls.
    pub dispatched: AtomicU64,
    /// Dispatches whose handler ran and returned a result.
    pub completed: AtomicU64,
    /// Dispatches answered from the idempotency cache.
    pub replayed: AtomicU64,
    /// Dispatches refused by policy.
    pub denied: AtomicU64,
    /// Dispatches that ended in an error result.
    pub failed: AtomicU64,
}

impl DispatchMetrics {
    /// Increment the dispatched counter.
    pub fn increment_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the completed counter.
    pub fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the replayed counter.
    pub fn increment_replayed(&self) {
        self.replayed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the denied counter.
    pub fn increment_denied(&self) {
        self.denied.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the failed counter.
    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a consistent point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched: self.dispatched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            replayed: self.replayed.load(Ordering::Relaxed),
            denied: self.denied.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// A plain data snapshot of [`DispatchMetrics`] at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of dispatch calls.
    pub dispatched: u64,
    /// Dispatches whose handler ran and returned a result.
    pub completed: u64,
    /// Dispatches answered from the idempotency cache.
    pub replayed: u64,
    /// Dispatches refused by policy.
    pub denied: u64,
    /// Dispatches that ended in an error result.
    pub failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = DispatchMetrics::default();
        let snap = m.snapshot();
        assert_eq!(snap.dispatched, 0);
        assert_eq!(snap.completed, 0);
        assert_eq!(snap.replayed, 0);
        assert_eq!(snap.denied, 0);
        assert_eq!(snap.failed, 0);
    }

    #[test]
    fn increment_and_snapshot() {
        let m = DispatchMetrics::default();
        m.increment_dispatched();
        m.increment_dispatched();
        m.increment_completed();
        m.increment_replayed();
        m.increment_denied();
        m.increment_failed();

        let snap = m.snapshot();
        assert_eq!(snap.dispatched, 2);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.replayed, 1);
        assert_eq!(snap.denied, 1);
        assert_eq!(snap.failed, 1);
    }
}
