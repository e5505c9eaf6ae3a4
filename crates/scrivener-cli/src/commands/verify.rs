//! The verify command: audit a draft's claims and report the gate
//! decision.

use crate::cli::VerifyArgs;
use crate::config::Config;
use crate::draft::DraftFile;
use crate::error::Result;
use crate::output::Formatter;
use scrivener_audit::{Auditor, HallucinationGate};
use scrivener_domain::HallMetric;
use scrivener_evidence::{default_adapters, RepoSnapshot};
use std::sync::Arc;

/// Audit the draft against the snapshot; returns whether the gate
/// accepted.
pub async fn execute_verify(
    args: VerifyArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<bool> {
    let snapshot = RepoSnapshot::from_dir(&args.source_dir, "workdir")?;
    let draft = DraftFile::load(&args.draft)?;
    let skill = draft.to_skill_draft();

    let mut audit_config = config.audit.clone();
    if let Some(threshold) = args.threshold {
        audit_config.threshold = threshold;
    }

    let auditor = Auditor::new(default_adapters(), audit_config)?;
    let gate = HallucinationGate::new(
        Arc::new(HallMetric::new()),
        auditor.config().threshold,
    );

    let outcome = auditor.audit(&skill.claims, &snapshot, &gate).await;

    let rows: Vec<_> = skill
        .claims
        .iter()
        .zip(&outcome.verdicts)
        .map(|(claim, verdict)| (claim.statement.clone(), verdict.clone()))
        .collect();
    println!("{}", formatter.format_verdicts(&rows)?);

    if outcome.decision.accept {
        println!(
            "{}",
            formatter.success(&format!(
                "hall_m {:.4} within threshold {:.4}",
                outcome.decision.hall_m,
                auditor.config().threshold
            ))
        );
    } else {
        println!(
            "{}",
            formatter.error(&format!(
                "hall_m {:.4} exceeds threshold {:.4}",
                outcome.decision.hall_m,
                auditor.config().threshold
            ))
        );
    }

    Ok(outcome.decision.accept)
}
