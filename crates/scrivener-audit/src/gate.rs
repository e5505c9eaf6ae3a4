//! The hallucination gate

use scrivener_domain::{AggregatedVerdict, HallMetric};
use std::sync::Arc;
use tracing::debug;

/// Outcome of a gate decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateDecision {
    /// Whether the run's ratio is within the threshold
    pub accept: bool,

    /// The ratio at decision time
    pub hall_m: f64,
}

/// Per-run gate over the hallucination ratio
///
/// Constructed per run around the run's own metric and passed by
/// reference through the run's context - never looked up from global or
/// module scope, so concurrent runs cannot contaminate each other.
/// Recording is safe from concurrent claim evaluations within the run;
/// the metric's counters are atomic.
pub struct HallucinationGate {
    metric: Arc<HallMetric>,
    threshold: f64,
}

impl HallucinationGate {
    /// Build a gate over a run's metric
    pub fn new(metric: Arc<HallMetric>, threshold: f64) -> Self {
        Self { metric, threshold }
    }

    /// Fold one verdict into the run's counters
    pub fn record(&self, verdict: &AggregatedVerdict) {
        if verdict.accepted {
            self.metric.record_validated();
        } else {
            self.metric.record_rejected();
        }
    }

    /// Apply the threshold to the ratio accumulated so far
    pub fn decide(&self) -> GateDecision {
        let hall_m = self.metric.hall_m();
        let accept = hall_m <= self.threshold;
        debug!(
            hall_m,
            threshold = self.threshold,
            accept,
            validated = self.metric.validated(),
            rejected = self.metric.rejected(),
            "gate decision"
        );
        GateDecision { accept, hall_m }
    }

    /// The configured threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
