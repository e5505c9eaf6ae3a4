//! Trust aggregation: many findings in, one verdict out

use crate::config::AuditConfig;
use scrivener_domain::{AggregatedVerdict, ClaimId, EvidenceFinding};
use tracing::debug;

/// Combines the per-method findings for one claim into a single
/// calibrated verdict
///
/// Precedence is strictly trust-level-based: a lower-trust contradiction
/// never overrides a higher-trust match outright, it only discounts the
/// confidence. Ties between equally trusted matches break by the
/// calibration table's method order.
#[derive(Debug, Clone)]
pub struct TrustAggregator {
    floor: f64,
    conflict_margin: f64,
}

impl TrustAggregator {
    /// Build an aggregator from the audit configuration
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            floor: config.confidence_floor,
            conflict_margin: config.conflict_margin,
        }
    }

    /// Aggregate one claim's findings into a verdict
    ///
    /// - no matching finding: rejected with confidence 0
    /// - otherwise confidence is the maximum trust among matches
    /// - an explicit no-match from a method within `conflict_margin` of
    ///   that confidence marks the verdict conflicting and halves the
    ///   effective confidence
    /// - accepted iff the effective confidence clears the floor
    ///
    /// `Unavailable` findings never contradict: a method that was not
    /// consulted says nothing about the claim.
    pub fn aggregate(&self, claim_id: ClaimId, findings: &[EvidenceFinding]) -> AggregatedVerdict {
        let Some(best) = best_match(findings) else {
            debug!(%claim_id, "no matching evidence");
            return AggregatedVerdict {
                claim_id,
                accepted: false,
                confidence: 0.0,
                conflicting: false,
            };
        };

        let confidence = best.trust_level;
        let conflicting = findings
            .iter()
            .any(|f| f.is_no_match() && f.trust_level >= confidence - self.conflict_margin);

        let effective = if conflicting {
            confidence / 2.0
        } else {
            confidence
        };
        let accepted = effective >= self.floor;

        debug!(
            %claim_id,
            method = best.method.as_str(),
            confidence = effective,
            conflicting,
            accepted,
            "aggregated verdict"
        );

        AggregatedVerdict {
            claim_id,
            accepted,
            confidence: effective,
            conflicting,
        }
    }
}

/// The highest-trust matching finding, ties broken by method priority
pub fn best_match(findings: &[EvidenceFinding]) -> Option<&EvidenceFinding> {
    findings.iter().filter(|f| f.is_match()).max_by(|a, b| {
        a.trust_level
            .partial_cmp(&b.trust_level)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.method.priority().cmp(&a.method.priority()))
    })
}
