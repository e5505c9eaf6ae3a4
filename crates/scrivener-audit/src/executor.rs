//! The Auditing stage executor

use crate::auditor::Auditor;
use crate::gate::HallucinationGate;
use async_trait::async_trait;
use scrivener_domain::{Artifact, StageError, StageResult, WorkflowStage};
use scrivener_evidence::RepoSnapshot;
use scrivener_pipeline::{StageContext, StageExecutor};
use std::sync::Arc;
use tracing::warn;

/// The one stage implementation the core owns
///
/// Reads the latest draft from the run's history, evidence-checks its
/// claims against the snapshot, and reports a threshold violation when
/// the gate rejects - which the supervisor turns into a regeneration
/// round rather than a plain failure.
pub struct AuditExecutor {
    auditor: Auditor,
    snapshot: Arc<RepoSnapshot>,
}

impl AuditExecutor {
    /// Create the executor over an auditor and the run's snapshot
    pub fn new(auditor: Auditor, snapshot: Arc<RepoSnapshot>) -> Self {
        Self { auditor, snapshot }
    }
}

#[async_trait]
impl StageExecutor for AuditExecutor {
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Auditing
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let Some(draft) = ctx.latest_draft() else {
            // Nothing to audit means Writing never produced a draft;
            // that is a broken pipeline, not a hallucination.
            warn!(run_id = %ctx.run_id(), "auditing reached without a draft");
            return ctx.fail(StageError::structural("no draft available to audit"));
        };

        // The gate lives on the run's own metric, handed down through
        // the context.
        let gate = HallucinationGate::new(
            ctx.hall_metric().clone(),
            self.auditor.config().threshold,
        );

        let outcome = self
            .auditor
            .audit(&draft.claims, &self.snapshot, &gate)
            .await;

        let report = Artifact::AuditReport {
            verdicts: outcome.verdicts,
            hall_m: outcome.decision.hall_m,
        };

        if outcome.decision.accept {
            ctx.ok(vec![report, Artifact::Citations(outcome.citations)])
        } else {
            // Keep the report in the trail: the rejected attempt's
            // verdicts are findings, not noise.
            StageResult {
                stage: ctx.stage(),
                attempt: ctx.attempt(),
                success: false,
                artifacts: vec![report],
                error: Some(StageError::threshold_violation(format!(
                    "hallucination threshold exceeded: hall_m {:.4} > {:.4}",
                    outcome.decision.hall_m,
                    gate.threshold(),
                ))),
            }
        }
    }
}
