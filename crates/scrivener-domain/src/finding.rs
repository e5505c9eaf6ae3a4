//! Per-method evidence findings

use crate::citation::SymbolLocation;
use crate::method::EvidenceMethod;

/// Outcome of one adapter's check
///
/// `Unavailable` is distinct from `NoMatch`: an adapter that could not
/// run (no backend configured, timed out) must never be folded into
/// "checked, no match", or the aggregator would count absence of tooling
/// as a contradiction.
#[derive(Debug, Clone, PartialEq)]
pub enum FindingStatus {
    /// The method located the subject
    Matched {
        /// Where the subject was found
        location: SymbolLocation,
    },

    /// The method ran and did not find the subject
    NoMatch,

    /// The method could not run
    Unavailable {
        /// Why the check did not happen (backend missing, timeout, ...)
        reason: String,
    },
}

/// The raw per-method result for one claim, consumed by the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceFinding {
    /// Method that produced this finding
    pub method: EvidenceMethod,

    /// What the method concluded
    pub status: FindingStatus,

    /// Human-readable detail for the audit trail
    pub detail: String,

    /// Calibrated trust of the producing method
    pub trust_level: f64,
}

impl EvidenceFinding {
    /// A positive finding at the given location
    pub fn matched(method: EvidenceMethod, location: SymbolLocation, detail: impl Into<String>) -> Self {
        Self {
            method,
            status: FindingStatus::Matched { location },
            detail: detail.into(),
            trust_level: method.trust_level(),
        }
    }

    /// The method ran and found nothing
    pub fn no_match(method: EvidenceMethod, detail: impl Into<String>) -> Self {
        Self {
            method,
            status: FindingStatus::NoMatch,
            detail: detail.into(),
            trust_level: method.trust_level(),
        }
    }

    /// The method could not be consulted
    pub fn unavailable(method: EvidenceMethod, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            method,
            status: FindingStatus::Unavailable { reason: reason.clone() },
            detail: reason,
            trust_level: method.trust_level(),
        }
    }

    /// True if the method located the subject
    pub fn is_match(&self) -> bool {
        matches!(self.status, FindingStatus::Matched { .. })
    }

    /// True if the method ran and explicitly found nothing
    pub fn is_no_match(&self) -> bool {
        matches!(self.status, FindingStatus::NoMatch)
    }
}
