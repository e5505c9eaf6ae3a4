//! Aggregated trust verdicts

use crate::claim::ClaimId;

/// The aggregator's single decision for one claim
///
/// Persists only for the lifetime of the owning run; the gate folds it
/// into the run's metric and the history keeps the trail.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedVerdict {
    /// Claim this verdict is about
    pub claim_id: ClaimId,

    /// Whether the claim cleared the confidence floor
    pub accepted: bool,

    /// Effective confidence after any contradiction discount
    pub confidence: f64,

    /// Whether a comparable-trust method explicitly contradicted a match
    pub conflicting: bool,
}
