//! Supervisor integration tests: full runs against scripted executors

use async_trait::async_trait;
use scrivener_domain::{
    Artifact, Claim, ClaimSubject, FailureKind, SkillDraft, StageError, StageResult, WorkflowStage,
};
use scrivener_pipeline::{
    CancelFlag, MinClaimsCriterion, PipelineConfig, StageContext, StageExecutor, Supervisor,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What a scripted stage does on one invocation
#[derive(Clone)]
enum Step {
    Ok(Vec<Artifact>),
    Fail(StageError),
}

/// Executor that replays a script, then succeeds forever
struct ScriptedStage {
    stage: WorkflowStage,
    script: Mutex<VecDeque<Step>>,
    attempts_seen: Mutex<Vec<u32>>,
}

impl ScriptedStage {
    fn new(stage: WorkflowStage, script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            stage,
            script: Mutex::new(script.into()),
            attempts_seen: Mutex::new(Vec::new()),
        })
    }

    fn always_ok(stage: WorkflowStage) -> Arc<Self> {
        Self::new(stage, vec![])
    }

    fn attempts_seen(&self) -> Vec<u32> {
        self.attempts_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageExecutor for ScriptedStage {
    fn stage(&self) -> WorkflowStage {
        self.stage
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        self.attempts_seen.lock().unwrap().push(ctx.attempt());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Ok(artifacts)) => ctx.ok(artifacts),
            Some(Step::Fail(error)) => ctx.fail(error),
            None => ctx.ok(vec![]),
        }
    }
}

fn draft_with_claims(n: usize) -> SkillDraft {
    let claims = (0..n)
        .map(|i| {
            Claim::new(
                ClaimSubject::Symbol {
                    name: format!("sym{}", i),
                    path: "src/lib.rs".to_string(),
                },
                format!("claim about sym{}", i),
            )
        })
        .collect();
    SkillDraft::new("skill-1", "Test skill", "body", claims)
}

fn wire(
    supervisor: Supervisor,
    overrides: Vec<Arc<ScriptedStage>>,
) -> (Supervisor, Vec<Arc<ScriptedStage>>) {
    let mut wired = supervisor;
    let mut stages: Vec<Arc<ScriptedStage>> = Vec::new();
    for stage in [
        WorkflowStage::Mining,
        WorkflowStage::Linking,
        WorkflowStage::Writing,
        WorkflowStage::Auditing,
        WorkflowStage::Verifying,
        WorkflowStage::Storing,
    ] {
        let executor = overrides
            .iter()
            .find(|e| e.stage == stage)
            .cloned()
            .unwrap_or_else(|| ScriptedStage::always_ok(stage));
        wired = wired.register(executor.clone());
        stages.push(executor);
    }
    (wired, stages)
}

#[tokio::test]
async fn test_happy_path_records_every_transition() {
    let (supervisor, _) = wire(Supervisor::new(PipelineConfig::default()), vec![]);
    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Complete);
    let visited: Vec<WorkflowStage> = run.history().iter().map(|r| r.stage).collect();
    assert_eq!(
        visited,
        vec![
            WorkflowStage::Init,
            WorkflowStage::Mining,
            WorkflowStage::Linking,
            WorkflowStage::Writing,
            WorkflowStage::Auditing,
            WorkflowStage::Verifying,
            WorkflowStage::Storing,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_three_times_fails_run() {
    let flaky = ScriptedStage::new(
        WorkflowStage::Linking,
        vec![
            Step::Fail(StageError::transient("connection reset")),
            Step::Fail(StageError::transient("connection reset")),
            Step::Fail(StageError::transient("connection reset")),
        ],
    );
    let (supervisor, _) = wire(
        Supervisor::new(PipelineConfig::default()),
        vec![flaky.clone()],
    );

    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Failed);
    // Exactly 3 attempts, numbered 1..=3, all in the history
    assert_eq!(flaky.attempts_seen(), vec![1, 2, 3]);
    let linking_results: Vec<&StageResult> = run
        .history()
        .iter()
        .filter(|r| r.stage == WorkflowStage::Linking)
        .collect();
    assert_eq!(linking_results.len(), 3);
    assert!(linking_results.iter().all(|r| !r.success));
    assert_eq!(
        run.terminal_error().unwrap().kind,
        FailureKind::Transient
    );
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_then_recovery() {
    let flaky = ScriptedStage::new(
        WorkflowStage::Verifying,
        vec![Step::Fail(StageError::transient("timeout"))],
    );
    let (supervisor, _) = wire(
        Supervisor::new(PipelineConfig::default()),
        vec![flaky.clone()],
    );

    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Complete);
    assert_eq!(flaky.attempts_seen(), vec![1, 2]);
    // Both the failed and the successful attempt are in the trail
    let verify_results: Vec<bool> = run
        .history()
        .iter()
        .filter(|r| r.stage == WorkflowStage::Verifying)
        .map(|r| r.success)
        .collect();
    assert_eq!(verify_results, vec![false, true]);
}

#[tokio::test]
async fn test_threshold_violation_regenerates_then_fails() {
    // Auditing rejects every round; the writer keeps producing drafts
    let config = PipelineConfig::default();
    let max_regens = config.max_regeneration_retries;

    let auditor = ScriptedStage::new(
        WorkflowStage::Auditing,
        (0..=max_regens)
            .map(|_| {
                Step::Fail(StageError::threshold_violation(
                    "hallucination threshold exceeded: hall_m 1.00 > 0.02",
                ))
            })
            .collect(),
    );
    let writer = ScriptedStage::always_ok(WorkflowStage::Writing);
    let (supervisor, _) = wire(
        Supervisor::new(config),
        vec![auditor.clone(), writer.clone()],
    );

    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Failed);
    // Initial writing plus one per regeneration round
    assert_eq!(
        writer.attempts_seen().len() as u32,
        1 + max_regens
    );
    // Regeneration resets the stage's transient budget: every attempt is #1
    assert!(writer.attempts_seen().iter().all(|&a| a == 1));
    assert_eq!(
        run.terminal_error().unwrap().kind,
        FailureKind::ThresholdViolation
    );
}

#[tokio::test]
async fn test_threshold_violation_then_clean_audit_completes() {
    let auditor = ScriptedStage::new(
        WorkflowStage::Auditing,
        vec![Step::Fail(StageError::threshold_violation(
            "hall_m 0.40 > 0.02",
        ))],
    );
    let (supervisor, _) = wire(
        Supervisor::new(PipelineConfig::default()),
        vec![auditor.clone()],
    );

    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Complete);
    assert_eq!(run.regeneration_count(), 1);
    assert_eq!(auditor.attempts_seen(), vec![1, 1]);
}

#[tokio::test]
async fn test_fatal_config_fails_immediately() {
    let miner = ScriptedStage::new(
        WorkflowStage::Mining,
        vec![Step::Fail(StageError::fatal_config("missing API credentials"))],
    );
    let (supervisor, _) = wire(
        Supervisor::new(PipelineConfig::default()),
        vec![miner.clone()],
    );

    let run = supervisor.run("skill-1").await;

    assert_eq!(run.stage(), WorkflowStage::Failed);
    assert_eq!(miner.attempts_seen(), vec![1]);
    assert_eq!(run.terminal_error().unwrap().kind, FailureKind::FatalConfig);
}

#[tokio::test]
async fn test_cancellation_honored_at_stage_boundary() {
    let cancel = CancelFlag::new();
    cancel.cancel();

    let (supervisor, stages) = wire(Supervisor::new(PipelineConfig::default()), vec![]);
    let run = supervisor.run_with_cancel("skill-1", cancel).await;

    assert_eq!(run.stage(), WorkflowStage::Failed);
    // No executor ever ran: the cancel was observed before Mining started
    assert!(stages.iter().all(|s| s.attempts_seen().is_empty()));
    let last = run.history().last().unwrap();
    assert!(last.error.as_ref().unwrap().message.contains("cancelled"));
}

#[tokio::test]
async fn test_completion_criterion_forces_regeneration() {
    // First draft is empty, second carries claims
    let writer = ScriptedStage::new(
        WorkflowStage::Writing,
        vec![
            Step::Ok(vec![Artifact::Draft(draft_with_claims(0))]),
            Step::Ok(vec![Artifact::Draft(draft_with_claims(3))]),
        ],
    );
    let auditor = ScriptedStage::new(
        WorkflowStage::Auditing,
        vec![Step::Ok(vec![Artifact::AuditReport {
            verdicts: vec![],
            hall_m: 0.0,
        }])],
    );

    let supervisor = Supervisor::new(PipelineConfig::default())
        .with_criterion(Arc::new(MinClaimsCriterion::new(1)));
    let (supervisor, _) = wire(supervisor, vec![writer.clone(), auditor]);

    let run = supervisor.run("skill-1").await;

    // Note: the audit report in round two carries no accepted verdicts,
    // so MinClaims(1) rejects it as well and the run eventually fails
    // after the regeneration budget drains.
    assert_eq!(run.stage(), WorkflowStage::Failed);
    assert!(run
        .history()
        .iter()
        .any(|r| !r.success
            && r.error
                .as_ref()
                .is_some_and(|e| e.message.contains("completion criterion"))));
}

#[tokio::test]
async fn test_two_concurrent_runs_have_isolated_metrics() {
    let (supervisor_a, _) = wire(Supervisor::new(PipelineConfig::default()), vec![]);
    let (supervisor_b, _) = wire(Supervisor::new(PipelineConfig::default()), vec![]);

    let (run_a, run_b) = tokio::join!(supervisor_a.run("skill-a"), supervisor_b.run("skill-b"));

    for _ in 0..5 {
        run_a.hall_metric().record_rejected();
        run_b.hall_metric().record_validated();
    }

    assert_eq!(run_a.hall_metric().hall_m(), 1.0);
    assert_eq!(run_b.hall_metric().hall_m(), 0.0);
}
