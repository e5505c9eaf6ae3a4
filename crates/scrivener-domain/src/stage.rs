//! Workflow stages and the fixed transition table

/// Stage in the generation pipeline
///
/// A run occupies exactly one stage at any instant, and every transition
/// comes from the fixed table encoded in [`WorkflowStage::on_success`]
/// and [`WorkflowStage::on_failure`]. `Complete` and `Failed` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowStage {
    /// Run created, nothing executed yet
    Init,

    /// Scan source for documentation-worthy material
    Mining,

    /// Link mined material to concrete symbols and locations
    Linking,

    /// Write the skill draft and its claims
    Writing,

    /// Evidence-check every claim and apply the hallucination gate
    Auditing,

    /// Check the accepted draft against the live snapshot
    Verifying,

    /// Commit the skill through the idempotency ledger
    Storing,

    /// Terminal: skill accepted and stored
    Complete,

    /// Terminal: run gave up
    Failed,
}

impl WorkflowStage {
    /// Successor on success, per the fixed transition table
    ///
    /// Terminal stages have no successor.
    pub fn on_success(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::Init => Some(WorkflowStage::Mining),
            WorkflowStage::Mining => Some(WorkflowStage::Linking),
            WorkflowStage::Linking => Some(WorkflowStage::Writing),
            WorkflowStage::Writing => Some(WorkflowStage::Auditing),
            WorkflowStage::Auditing => Some(WorkflowStage::Verifying),
            WorkflowStage::Verifying => Some(WorkflowStage::Storing),
            WorkflowStage::Storing => Some(WorkflowStage::Complete),
            WorkflowStage::Complete | WorkflowStage::Failed => None,
        }
    }

    /// Successor on non-retryable failure
    ///
    /// Every non-terminal stage fails to `Failed`; the regeneration path
    /// from Auditing back to Writing is a supervisor policy, not a table
    /// entry, because it only applies to threshold violations.
    pub fn on_failure(&self) -> Option<WorkflowStage> {
        match self {
            WorkflowStage::Complete | WorkflowStage::Failed => None,
            _ => Some(WorkflowStage::Failed),
        }
    }

    /// True for `Complete` and `Failed`
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStage::Complete | WorkflowStage::Failed)
    }

    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Init => "init",
            WorkflowStage::Mining => "mining",
            WorkflowStage::Linking => "linking",
            WorkflowStage::Writing => "writing",
            WorkflowStage::Auditing => "auditing",
            WorkflowStage::Verifying => "verifying",
            WorkflowStage::Storing => "storing",
            WorkflowStage::Complete => "complete",
            WorkflowStage::Failed => "failed",
        }
    }

    /// Parse a stage from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "init" => Some(WorkflowStage::Init),
            "mining" => Some(WorkflowStage::Mining),
            "linking" => Some(WorkflowStage::Linking),
            "writing" => Some(WorkflowStage::Writing),
            "auditing" => Some(WorkflowStage::Auditing),
            "verifying" => Some(WorkflowStage::Verifying),
            "storing" => Some(WorkflowStage::Storing),
            "complete" => Some(WorkflowStage::Complete),
            "failed" => Some(WorkflowStage::Failed),
            _ => None,
        }
    }
}

impl std::str::FromStr for WorkflowStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid stage: {}", s))
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
