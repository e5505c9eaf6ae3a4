//! Run identifiers, stage artifacts, and the per-attempt audit trail

use crate::citation::SourceRef;
use crate::claim::ClaimSubject;
use crate::failure::StageError;
use crate::skill::SkillDraft;
use crate::stage::WorkflowStage;
use crate::verdict::AggregatedVerdict;
use std::fmt;

/// Unique identifier for a pipeline run (UUIDv7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new UUIDv7-based RunId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A subject linked to its candidate citations, produced by Linking
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolLink {
    /// Subject that was linked
    pub subject: ClaimSubject,

    /// Candidate citations for the subject
    pub candidates: Vec<SourceRef>,
}

/// What a stage handed back to the supervisor
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// Mining: the files selected for analysis
    SourceSet(Vec<String>),

    /// Linking: subjects mapped to candidate locations
    SymbolMap(Vec<SymbolLink>),

    /// Writing: the skill draft with its claims
    Draft(SkillDraft),

    /// Auditing: per-claim verdicts plus the run's ratio at decision time
    AuditReport {
        /// One verdict per claim
        verdicts: Vec<AggregatedVerdict>,
        /// Hallucination ratio when the gate decided
        hall_m: f64,
    },

    /// Auditing: evidence-backed citations for the accepted claims
    Citations(Vec<SourceRef>),

    /// Storing: the committed record
    StoredRecord {
        /// Identifier returned by the persistence sink
        record_id: String,
        /// True when the ledger had already seen this skill+content
        deduplicated: bool,
    },
}

/// Outcome of one stage attempt, appended to the run's history
///
/// The history is the complete, replayable audit trail: every attempt of
/// every stage appears exactly once, whether it succeeded or not.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    /// Stage that executed
    pub stage: WorkflowStage,

    /// 1-based attempt number within this stage visit
    pub attempt: u32,

    /// Whether the attempt succeeded
    pub success: bool,

    /// What the stage produced, if anything
    pub artifacts: Vec<Artifact>,

    /// Error captured on failure
    pub error: Option<StageError>,
}

impl StageResult {
    /// A successful attempt with artifacts
    pub fn ok(stage: WorkflowStage, attempt: u32, artifacts: Vec<Artifact>) -> Self {
        Self {
            stage,
            attempt,
            success: true,
            artifacts,
            error: None,
        }
    }

    /// A failed attempt
    pub fn failed(stage: WorkflowStage, attempt: u32, error: StageError) -> Self {
        Self {
            stage,
            attempt,
            success: false,
            artifacts: Vec::new(),
            error: Some(error),
        }
    }
}
