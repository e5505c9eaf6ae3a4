//! The Pipeline Supervisor state machine

use crate::cancel::CancelFlag;
use crate::config::PipelineConfig;
use crate::criterion::{AlwaysComplete, CompletionCriterion};
use crate::error::PipelineError;
use crate::executor::{StageContext, StageExecutor};
use crate::run::PipelineRun;
use scrivener_domain::{FailureKind, StageError, StageResult, WorkflowStage};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Stages the supervisor dispatches to an executor
const EXECUTABLE_STAGES: [WorkflowStage; 6] = [
    WorkflowStage::Mining,
    WorkflowStage::Linking,
    WorkflowStage::Writing,
    WorkflowStage::Auditing,
    WorkflowStage::Verifying,
    WorkflowStage::Storing,
];

/// Drives runs through the fixed stage graph
///
/// The supervisor is the only component that mutates a [`PipelineRun`].
/// It enforces the transition table, the two retry budgets, and the
/// rule that every attempt lands in the history exactly once.
pub struct Supervisor {
    config: PipelineConfig,
    executors: HashMap<WorkflowStage, Arc<dyn StageExecutor>>,
    criterion: Arc<dyn CompletionCriterion>,
}

impl Supervisor {
    /// Create a supervisor with no executors registered
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            executors: HashMap::new(),
            criterion: Arc::new(AlwaysComplete),
        }
    }

    /// Register an executor for its stage; a later registration for the
    /// same stage replaces the earlier one
    pub fn register(mut self, executor: Arc<dyn StageExecutor>) -> Self {
        self.executors.insert(executor.stage(), executor);
        self
    }

    /// Use a completion criterion other than the default
    pub fn with_criterion(mut self, criterion: Arc<dyn CompletionCriterion>) -> Self {
        self.criterion = criterion;
        self
    }

    /// Check that every executable stage has an executor and the config
    /// is sound
    pub fn validate_wiring(&self) -> Result<(), PipelineError> {
        self.config
            .validate()
            .map_err(PipelineError::Config)?;
        for stage in EXECUTABLE_STAGES {
            if !self.executors.contains_key(&stage) {
                return Err(PipelineError::MissingExecutor(stage));
            }
        }
        Ok(())
    }

    /// Run a skill through the pipeline to a terminal state
    pub async fn run(&self, skill_id: &str) -> PipelineRun {
        self.run_with_cancel(skill_id, CancelFlag::new()).await
    }

    /// Run with an external cancel signal, honored at stage boundaries
    pub async fn run_with_cancel(&self, skill_id: &str, cancel: CancelFlag) -> PipelineRun {
        let mut run = PipelineRun::new(skill_id);

        // Init validates the wiring; a hole here is a fatal config error
        // with zero retries.
        if let Err(e) = self.validate_wiring() {
            error!(run_id = %run.id(), "pipeline misconfigured: {}", e);
            run.record(StageResult::failed(
                WorkflowStage::Init,
                1,
                StageError::fatal_config(e.to_string()),
            ));
            run.transition(WorkflowStage::Failed);
            return run;
        }

        run.record(StageResult::ok(WorkflowStage::Init, 1, vec![]));
        run.transition(WorkflowStage::Mining);
        info!(run_id = %run.id(), skill_id, "run started");

        while !run.stage().is_terminal() {
            if cancel.is_cancelled() {
                let stage = run.stage();
                info!(run_id = %run.id(), stage = %stage, "cancel observed at stage boundary");
                run.record(StageResult::failed(
                    stage,
                    run.attempt_count(stage) + 1,
                    StageError::transient("run cancelled"),
                ));
                run.transition(WorkflowStage::Failed);
                break;
            }

            let stage = run.stage();
            let Some(executor) = self.executors.get(&stage) else {
                // Unreachable after validate_wiring, but a hole must
                // still fail loudly rather than hang the run.
                run.record(StageResult::failed(
                    stage,
                    1,
                    StageError::fatal_config(format!("no executor for stage '{}'", stage)),
                ));
                run.transition(WorkflowStage::Failed);
                break;
            };

            let attempt = run.next_attempt(stage);
            let ctx = StageContext::new(
                run.id(),
                skill_id,
                stage,
                attempt,
                run.regeneration_count(),
                cancel.clone(),
                run.hall_metric().clone(),
                run.history().to_vec(),
            );

            debug!(run_id = %run.id(), stage = %stage, attempt, "executing stage");
            let result = executor.execute(ctx.clone()).await;
            run.record(result.clone());

            if result.success {
                self.advance(&mut run, &ctx, &result);
            } else {
                self.react_to_failure(&mut run, stage, &result).await;
            }
        }

        match run.stage() {
            WorkflowStage::Complete => {
                info!(run_id = %run.id(), skill_id, hall_m = run.hall_metric().hall_m(), "run complete")
            }
            _ => warn!(
                run_id = %run.id(),
                skill_id,
                error = %run.terminal_error().map(|e| e.to_string()).unwrap_or_default(),
                "run failed"
            ),
        }

        run
    }

    fn advance(&self, run: &mut PipelineRun, ctx: &StageContext, result: &StageResult) {
        let stage = result.stage;

        if matches!(stage, WorkflowStage::Writing | WorkflowStage::Auditing)
            && !self.criterion.is_satisfied(ctx, result)
        {
            let detail = format!("completion criterion unsatisfied: {}", self.criterion.describe());
            warn!(run_id = %run.id(), stage = %stage, "{}", detail);
            run.record(StageResult::failed(
                stage,
                result.attempt,
                StageError::structural(detail.clone()),
            ));
            self.regenerate(run, &detail);
            return;
        }

        if let Some(next) = stage.on_success() {
            debug!(run_id = %run.id(), from = %stage, to = %next, "stage transition");
            run.transition(next);
        }
    }

    async fn react_to_failure(
        &self,
        run: &mut PipelineRun,
        stage: WorkflowStage,
        result: &StageResult,
    ) {
        let error = result.error.clone().unwrap_or_else(|| {
            // An executor that fails without an error still gets a typed
            // trail entry.
            StageError::transient("stage reported failure without error detail")
        });

        match error.kind {
            FailureKind::FatalConfig => {
                error!(run_id = %run.id(), stage = %stage, "fatal: {}", error.message);
                run.transition(WorkflowStage::Failed);
            }

            FailureKind::ThresholdViolation => {
                self.regenerate(run, &error.message);
            }

            FailureKind::Transient => {
                let attempts = run.attempt_count(stage);
                if attempts >= self.config.max_retries {
                    warn!(
                        run_id = %run.id(),
                        stage = %stage,
                        attempts,
                        "transient retry budget exhausted"
                    );
                    run.transition(WorkflowStage::Failed);
                } else {
                    let delay = self.config.backoff(attempts);
                    debug!(
                        run_id = %run.id(),
                        stage = %stage,
                        attempts,
                        "retrying after {:?}", delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            // A structural error at stage level means the stage could
            // not produce output at all; per-claim structural misses are
            // absorbed inside Auditing and never reach here.
            FailureKind::Structural => {
                warn!(run_id = %run.id(), stage = %stage, "structural: {}", error.message);
                run.transition(WorkflowStage::Failed);
            }
        }
    }

    /// Route back to Writing for another draft, bounded by the
    /// regeneration budget
    fn regenerate(&self, run: &mut PipelineRun, reason: &str) {
        let round = run.bump_regeneration();
        if round > self.config.max_regeneration_retries {
            warn!(
                run_id = %run.id(),
                rounds = round - 1,
                "regeneration budget exhausted: {}", reason
            );
            run.transition(WorkflowStage::Failed);
        } else {
            info!(
                run_id = %run.id(),
                round,
                max = self.config.max_regeneration_retries,
                "regenerating draft: {}", reason
            );
            // Fresh visit: the transient budgets of the loop's stages
            // start over, the regeneration budget does not.
            run.reset_attempts(WorkflowStage::Writing);
            run.reset_attempts(WorkflowStage::Auditing);
            run.hall_metric().reset();
            run.transition(WorkflowStage::Writing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopStage(WorkflowStage);

    #[async_trait]
    impl StageExecutor for NoopStage {
        fn stage(&self) -> WorkflowStage {
            self.0
        }

        async fn execute(&self, ctx: StageContext) -> StageResult {
            ctx.ok(vec![])
        }
    }

    fn fully_wired() -> Supervisor {
        let mut supervisor = Supervisor::new(PipelineConfig::default());
        for stage in EXECUTABLE_STAGES {
            supervisor = supervisor.register(Arc::new(NoopStage(stage)));
        }
        supervisor
    }

    #[test]
    fn test_validate_wiring_missing_executor() {
        let supervisor = Supervisor::new(PipelineConfig::default());
        match supervisor.validate_wiring() {
            Err(PipelineError::MissingExecutor(stage)) => {
                assert_eq!(stage, WorkflowStage::Mining);
            }
            other => panic!("Expected MissingExecutor, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_validate_wiring_complete() {
        assert!(fully_wired().validate_wiring().is_ok());
    }

    #[tokio::test]
    async fn test_missing_executor_fails_run_at_init() {
        let supervisor = Supervisor::new(PipelineConfig::default());
        let run = supervisor.run("skill-1").await;

        assert_eq!(run.stage(), WorkflowStage::Failed);
        assert_eq!(run.history().len(), 1);
        let init = &run.history()[0];
        assert_eq!(init.stage, WorkflowStage::Init);
        assert_eq!(init.error.as_ref().unwrap().kind, FailureKind::FatalConfig);
    }

    #[tokio::test]
    async fn test_happy_path_reaches_complete() {
        let run = fully_wired().run("skill-1").await;

        assert_eq!(run.stage(), WorkflowStage::Complete);
        // Init plus the six executable stages
        assert_eq!(run.history().len(), 7);
        assert!(run.history().iter().all(|r| r.success));
    }
}
