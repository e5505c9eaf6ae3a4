//! Failure taxonomy for stage errors

/// How a stage failure should be treated by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Timeout, network trouble: retry the same stage with backoff
    Transient,

    /// A referenced file or symbol is absent: rejects the affected claim,
    /// never fatal to the run
    Structural,

    /// The hallucination ratio exceeded the threshold: route back to
    /// Writing for regeneration
    ThresholdViolation,

    /// Missing credentials or malformed configuration: fail immediately,
    /// zero retries
    FatalConfig,
}

impl FailureKind {
    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transient => "transient",
            FailureKind::Structural => "structural",
            FailureKind::ThresholdViolation => "threshold-violation",
            FailureKind::FatalConfig => "fatal-config",
        }
    }
}

/// A typed error captured into the owning StageResult
#[derive(Debug, Clone, PartialEq)]
pub struct StageError {
    /// Failure class driving the supervisor's reaction
    pub kind: FailureKind,

    /// What went wrong, for the audit trail
    pub message: String,
}

impl StageError {
    /// A transient failure
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transient,
            message: message.into(),
        }
    }

    /// A structural failure
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Structural,
            message: message.into(),
        }
    }

    /// A hallucination threshold violation
    pub fn threshold_violation(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ThresholdViolation,
            message: message.into(),
        }
    }

    /// A fatal configuration failure
    pub fn fatal_config(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::FatalConfig,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}
