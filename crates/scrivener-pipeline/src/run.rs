//! The mutable record of one pipeline run

use scrivener_domain::{HallMetric, RunId, StageError, StageResult, WorkflowStage};
use std::collections::HashMap;
use std::sync::Arc;

/// One skill-generation run
///
/// Created at submission, mutated only by the supervisor, frozen once
/// terminal. The run owns its `HallMetric`: every recording path reaches
/// the metric through this run, so concurrent runs cannot contaminate
/// each other's counters.
#[derive(Debug)]
pub struct PipelineRun {
    id: RunId,
    skill_id: String,
    stage: WorkflowStage,
    attempt_counts: HashMap<WorkflowStage, u32>,
    regeneration_count: u32,
    history: Vec<StageResult>,
    hall_metric: Arc<HallMetric>,
}

impl PipelineRun {
    /// Create a run in the Init stage with a fresh metric
    pub fn new(skill_id: impl Into<String>) -> Self {
        Self {
            id: RunId::new(),
            skill_id: skill_id.into(),
            stage: WorkflowStage::Init,
            attempt_counts: HashMap::new(),
            regeneration_count: 0,
            history: Vec::new(),
            hall_metric: Arc::new(HallMetric::new()),
        }
    }

    /// The run's id
    pub fn id(&self) -> RunId {
        self.id
    }

    /// The skill being generated
    pub fn skill_id(&self) -> &str {
        &self.skill_id
    }

    /// The stage the run currently occupies
    pub fn stage(&self) -> WorkflowStage {
        self.stage
    }

    /// Attempts recorded for a stage in its current visit
    pub fn attempt_count(&self, stage: WorkflowStage) -> u32 {
        self.attempt_counts.get(&stage).copied().unwrap_or(0)
    }

    /// Regeneration rounds consumed
    pub fn regeneration_count(&self) -> u32 {
        self.regeneration_count
    }

    /// The complete audit trail, oldest first
    pub fn history(&self) -> &[StageResult] {
        &self.history
    }

    /// The run's own hallucination metric
    pub fn hall_metric(&self) -> &Arc<HallMetric> {
        &self.hall_metric
    }

    /// True once the run reached Complete or Failed
    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    /// The error on the final recorded attempt, if the run failed
    pub fn terminal_error(&self) -> Option<&StageError> {
        if self.stage != WorkflowStage::Failed {
            return None;
        }
        self.history.iter().rev().find_map(|r| r.error.as_ref())
    }

    /// The stored record id, if the run completed
    pub fn stored_record(&self) -> Option<(&str, bool)> {
        self.history.iter().rev().find_map(|r| {
            r.artifacts.iter().find_map(|a| match a {
                scrivener_domain::Artifact::StoredRecord {
                    record_id,
                    deduplicated,
                } => Some((record_id.as_str(), *deduplicated)),
                _ => None,
            })
        })
    }

    // --- supervisor-only mutations below ---

    pub(crate) fn record(&mut self, result: StageResult) {
        assert!(
            !self.stage.is_terminal(),
            "attempted to mutate a terminal run"
        );
        self.history.push(result);
    }

    pub(crate) fn transition(&mut self, next: WorkflowStage) {
        assert!(
            !self.stage.is_terminal(),
            "attempted to transition a terminal run"
        );
        self.stage = next;
    }

    /// Increment and return the attempt counter for a stage
    pub(crate) fn next_attempt(&mut self, stage: WorkflowStage) -> u32 {
        let count = self.attempt_counts.entry(stage).or_insert(0);
        *count += 1;
        *count
    }

    /// Begin a fresh visit of a stage (regeneration re-enters Writing
    /// and Auditing with clean transient budgets)
    pub(crate) fn reset_attempts(&mut self, stage: WorkflowStage) {
        self.attempt_counts.remove(&stage);
    }

    pub(crate) fn bump_regeneration(&mut self) -> u32 {
        self.regeneration_count += 1;
        self.regeneration_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_starts_at_init() {
        let run = PipelineRun::new("skill-1");
        assert_eq!(run.stage(), WorkflowStage::Init);
        assert!(!run.is_terminal());
        assert!(run.history().is_empty());
        assert_eq!(run.hall_metric().hall_m(), 0.0);
    }

    #[test]
    fn test_attempt_counting() {
        let mut run = PipelineRun::new("skill-1");
        assert_eq!(run.next_attempt(WorkflowStage::Mining), 1);
        assert_eq!(run.next_attempt(WorkflowStage::Mining), 2);
        assert_eq!(run.attempt_count(WorkflowStage::Mining), 2);
        assert_eq!(run.attempt_count(WorkflowStage::Linking), 0);

        run.reset_attempts(WorkflowStage::Mining);
        assert_eq!(run.attempt_count(WorkflowStage::Mining), 0);
    }

    #[test]
    #[should_panic(expected = "terminal run")]
    fn test_terminal_run_rejects_mutation() {
        let mut run = PipelineRun::new("skill-1");
        run.transition(WorkflowStage::Failed);
        run.record(StageResult::ok(WorkflowStage::Mining, 1, vec![]));
    }

    #[test]
    fn test_runs_have_isolated_metrics() {
        let run_a = PipelineRun::new("skill-a");
        let run_b = PipelineRun::new("skill-b");

        for _ in 0..5 {
            run_a.hall_metric().record_rejected();
            run_b.hall_metric().record_validated();
        }

        assert_eq!(run_a.hall_metric().hall_m(), 1.0);
        assert_eq!(run_b.hall_metric().hall_m(), 0.0);
    }
}
