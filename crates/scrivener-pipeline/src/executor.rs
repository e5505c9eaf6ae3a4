//! The Stage Executor contract

use crate::cancel::CancelFlag;
use async_trait::async_trait;
use scrivener_domain::result::SymbolLink;
use scrivener_domain::{
    AggregatedVerdict, Artifact, HallMetric, RunId, SkillDraft, StageError, StageResult,
    WorkflowStage,
};
use std::sync::Arc;

/// Immutable view of a run handed to a stage executor
///
/// The context carries everything an executor may read: the run's
/// identity, the current attempt number, and the accumulated history.
/// Repeated invocation with the same context must be idempotent-safe -
/// an executor can see `attempt > 1` and must not assume it is the first
/// attempt.
#[derive(Debug, Clone)]
pub struct StageContext {
    run_id: RunId,
    skill_id: String,
    stage: WorkflowStage,
    attempt: u32,
    regeneration: u32,
    cancel: CancelFlag,
    hall_metric: Arc<HallMetric>,
    history: Arc<[StageResult]>,
}

impl StageContext {
    /// Build a context; called by the supervisor (and by tests)
    pub fn new(
        run_id: RunId,
        skill_id: impl Into<String>,
        stage: WorkflowStage,
        attempt: u32,
        regeneration: u32,
        cancel: CancelFlag,
        hall_metric: Arc<HallMetric>,
        history: Vec<StageResult>,
    ) -> Self {
        Self {
            run_id,
            skill_id: skill_id.into(),
            stage,
            attempt,
            regeneration,
            cancel,
            hall_metric,
            history: history.into(),
        }
    }

    /// The owning run's id
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// The skill this run is generating
    pub fn skill_id(&self) -> &str {
        &self.skill_id
    }

    /// The stage being executed
    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// 1-based attempt number within the current stage visit
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// How many regeneration rounds the run has been through
    pub fn regeneration(&self) -> u32 {
        self.regeneration
    }

    /// Whether cancellation has been requested
    ///
    /// Long-running executors may poll this to finish early; the
    /// supervisor itself only acts on it at stage boundaries.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The owning run's hallucination metric
    ///
    /// The Auditing executor builds its gate over this; the run owns the
    /// metric, so concurrent runs can never share counters.
    pub fn hall_metric(&self) -> &Arc<HallMetric> {
        &self.hall_metric
    }

    /// The full history so far, oldest first
    pub fn history(&self) -> &[StageResult] {
        &self.history
    }

    /// The most recent skill draft, if Writing has produced one
    pub fn latest_draft(&self) -> Option<&SkillDraft> {
        self.successful_artifacts().find_map(|a| match a {
            Artifact::Draft(draft) => Some(draft),
            _ => None,
        })
    }

    /// The most recent mined source set
    pub fn latest_source_set(&self) -> Option<&[String]> {
        self.successful_artifacts().find_map(|a| match a {
            Artifact::SourceSet(paths) => Some(paths.as_slice()),
            _ => None,
        })
    }

    /// The most recent symbol map from Linking
    pub fn latest_symbol_map(&self) -> Option<&[SymbolLink]> {
        self.successful_artifacts().find_map(|a| match a {
            Artifact::SymbolMap(links) => Some(links.as_slice()),
            _ => None,
        })
    }

    /// The most recent audit report
    pub fn latest_audit(&self) -> Option<(&[AggregatedVerdict], f64)> {
        self.successful_artifacts().find_map(|a| match a {
            Artifact::AuditReport { verdicts, hall_m } => Some((verdicts.as_slice(), *hall_m)),
            _ => None,
        })
    }

    /// The most recent evidence-backed citations
    pub fn latest_citations(&self) -> Option<&[scrivener_domain::SourceRef]> {
        self.successful_artifacts().find_map(|a| match a {
            Artifact::Citations(refs) => Some(refs.as_slice()),
            _ => None,
        })
    }

    /// A successful result for this context's stage and attempt
    pub fn ok(&self, artifacts: Vec<Artifact>) -> StageResult {
        StageResult::ok(self.stage, self.attempt, artifacts)
    }

    /// A failed result for this context's stage and attempt
    pub fn fail(&self, error: StageError) -> StageResult {
        StageResult::failed(self.stage, self.attempt, error)
    }

    fn successful_artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.history
            .iter()
            .rev()
            .filter(|r| r.success)
            .flat_map(|r| r.artifacts.iter())
    }
}

/// Uniform interface each generation stage must satisfy
///
/// Implementations for Mine/Link/Write/Verify are external
/// collaborators; Audit and Store are the core-owned ones. Executors
/// report failure through the returned `StageResult`, never by panicking,
/// so the supervisor always gets a typed trail entry.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    /// The stage this executor implements
    fn stage(&self) -> WorkflowStage;

    /// Execute one attempt
    async fn execute(&self, ctx: StageContext) -> StageResult;
}
