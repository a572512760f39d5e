//! Counters describing what the cleaner has done so far.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cleaner activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanerStats {
    /// Registrations ever made
    pub registered: u64,
    /// Actions run through [`Cleanable::clean`](super::Cleanable::clean)
    pub explicit_cleanups: u64,
    /// Actions run because their owner became unreachable
    pub automatic_cleanups: u64,
    /// Automatic actions that returned an error or panicked
    pub failures: u64,
    /// Registrations not yet cleaned
    pub pending: usize,
}

#[derive(Debug, Default)]
pub(crate) struct CleanerMetrics {
    registered: AtomicU64,
    explicit_cleanups: AtomicU64,
    automatic_cleanups: AtomicU64,
    failures: AtomicU64,
}

impl CleanerMetrics {
    pub(crate) fn record_registered(&self) {
        self.registered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_explicit(&self) {
        self.explicit_cleanups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_automatic(&self) {
        self.automatic_cleanups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, pending: usize) -> CleanerStats {
        CleanerStats {
            registered: self.registered.load(Ordering::Relaxed),
            explicit_cleanups: self.explicit_cleanups.load(Ordering::Relaxed),
            automatic_cleanups: self.automatic_cleanups.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            pending,
        }
    }
}
