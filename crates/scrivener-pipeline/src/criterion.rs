//! Typed completion criteria
//!
//! The supervisor consults a criterion after successful Writing and
//! Auditing attempts to decide whether the draft is complete enough to
//! move forward. This replaces any notion of detecting completion by
//! pattern-matching over generated text: the decision is a predicate
//! over typed state.

use crate::executor::StageContext;
use scrivener_domain::{StageResult, WorkflowStage};

/// Predicate deciding whether a run's draft is complete
pub trait CompletionCriterion: Send + Sync {
    /// Evaluate the criterion against the stage that just succeeded
    fn is_satisfied(&self, ctx: &StageContext, result: &StageResult) -> bool;

    /// Short description for the audit trail
    fn describe(&self) -> String;
}

/// Accepts every draft; the default when no criterion is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysComplete;

impl CompletionCriterion for AlwaysComplete {
    fn is_satisfied(&self, _ctx: &StageContext, _result: &StageResult) -> bool {
        true
    }

    fn describe(&self) -> String {
        "always-complete".to_string()
    }
}

/// Requires the draft to carry at least `min` claims
///
/// After Auditing it additionally requires that many accepted verdicts,
/// so a draft cannot complete on claims the audit struck down.
#[derive(Debug, Clone, Copy)]
pub struct MinClaimsCriterion {
    /// Minimum number of claims (and accepted verdicts post-audit)
    pub min: usize,
}

impl MinClaimsCriterion {
    /// Create a criterion requiring `min` claims
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl CompletionCriterion for MinClaimsCriterion {
    fn is_satisfied(&self, _ctx: &StageContext, result: &StageResult) -> bool {
        match result.stage {
            WorkflowStage::Writing => {
                let claims = result
                    .artifacts
                    .iter()
                    .find_map(|a| match a {
                        scrivener_domain::Artifact::Draft(d) => Some(d.claims.len()),
                        _ => None,
                    })
                    .unwrap_or(0);
                claims >= self.min
            }
            WorkflowStage::Auditing => {
                let accepted = result
                    .artifacts
                    .iter()
                    .find_map(|a| match a {
                        scrivener_domain::Artifact::AuditReport { verdicts, .. } => {
                            Some(verdicts.iter().filter(|v| v.accepted).count())
                        }
                        _ => None,
                    })
                    .unwrap_or(0);
                accepted >= self.min
            }
            _ => true,
        }
    }

    fn describe(&self) -> String {
        format!("min-claims({})", self.min)
    }
}
