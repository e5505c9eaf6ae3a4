//! The Storing stage executor

use crate::error::LedgerError;
use crate::ledger::{IdempotencyKey, InMemoryLedger};
use async_trait::async_trait;
use scrivener_domain::traits::PersistenceSink;
use scrivener_domain::{Artifact, StageError, StageResult, WorkflowStage};
use scrivener_pipeline::{StageContext, StageExecutor};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Commits the accepted skill through the idempotency ledger
///
/// Sink failures surface as transient errors so the supervisor retries;
/// the ledger guarantees the retry cannot double-commit.
pub struct StoreExecutor<S> {
    ledger: Arc<InMemoryLedger>,
    sink: Arc<Mutex<S>>,
}

impl<S> StoreExecutor<S>
where
    S: PersistenceSink,
{
    /// Create the executor over a shared ledger and sink
    pub fn new(ledger: Arc<InMemoryLedger>, sink: Arc<Mutex<S>>) -> Self {
        Self { ledger, sink }
    }
}

#[async_trait]
impl<S> StageExecutor for StoreExecutor<S>
where
    S: PersistenceSink + Send + 'static,
    S::Error: std::fmt::Display,
{
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Storing
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let Some(draft) = ctx.latest_draft() else {
            return ctx.fail(StageError::structural("no draft available to store"));
        };
        let citations = ctx.latest_citations().unwrap_or(&[]).to_vec();

        let key = IdempotencyKey::for_content(&draft.skill_id, &draft.body);
        let committed = self.ledger.get_or_commit(&key, || {
            let mut sink = self.sink.lock().map_err(|_| LedgerError::Lock)?;
            sink.commit(&draft.skill_id, &draft.body, &citations)
                .map_err(|e| LedgerError::Sink(e.to_string()))
        });

        match committed {
            Ok((record_id, deduplicated)) => {
                info!(
                    run_id = %ctx.run_id(),
                    %record_id,
                    deduplicated,
                    citations = citations.len(),
                    "skill stored"
                );
                ctx.ok(vec![Artifact::StoredRecord {
                    record_id,
                    deduplicated,
                }])
            }
            Err(e) => ctx.fail(StageError::transient(e.to_string())),
        }
    }
}
