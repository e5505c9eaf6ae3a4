//! Per-run hallucination metric

use std::sync::atomic::{AtomicU64, Ordering};

/// Validated/rejected claim counters scoped to exactly one pipeline run
///
/// The metric is owned by its run and handed by reference to whatever
/// records into it; it is never looked up from global or module scope.
/// Counters are atomic so concurrent claim evaluations within one run can
/// record without external locking, while separate runs stay fully
/// isolated by construction.
#[derive(Debug, Default)]
pub struct HallMetric {
    validated: AtomicU64,
    rejected: AtomicU64,
}

impl HallMetric {
    /// Create a fresh metric with zero counts
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one validated claim
    pub fn record_validated(&self) {
        self.validated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one rejected claim
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of validated claims so far
    pub fn validated(&self) -> u64 {
        self.validated.load(Ordering::Relaxed)
    }

    /// Number of rejected claims so far
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Total claims recorded
    pub fn total(&self) -> u64 {
        self.validated() + self.rejected()
    }

    /// Hallucination ratio: rejected / (validated + rejected)
    ///
    /// Defined as 0.0 when nothing has been recorded.
    pub fn hall_m(&self) -> f64 {
        let validated = self.validated();
        let rejected = self.rejected();
        let total = validated + rejected;
        if total == 0 {
            0.0
        } else {
            rejected as f64 / total as f64
        }
    }

    /// Reset both counters (used between regeneration attempts)
    pub fn reset(&self) {
        self.validated.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
    }
}
