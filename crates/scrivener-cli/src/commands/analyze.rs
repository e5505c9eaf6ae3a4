//! The analyze command: per-claim evidence findings without gating.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::draft::DraftFile;
use crate::error::Result;
use crate::output::Formatter;
use futures::future::join_all;
use scrivener_audit::TrustAggregator;
use scrivener_evidence::{check_with_timeout, default_adapters, RepoSnapshot};
use scrivener_domain::EvidenceFinding;

/// Show what each evidence method says about each claim.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let snapshot = RepoSnapshot::from_dir(&args.source_dir, "workdir")?;
    let draft = DraftFile::load(&args.draft)?;
    let skill = draft.to_skill_draft();

    let adapters = default_adapters();
    let aggregator = TrustAggregator::new(&config.audit);
    let timeout = config.audit.adapter_timeout();

    for claim in &skill.claims {
        let checks = adapters
            .iter()
            .map(|adapter| check_with_timeout(adapter.as_ref(), &claim.subject, &snapshot, timeout));
        let findings: Vec<EvidenceFinding> = join_all(checks).await;

        println!("{}", formatter.format_findings(&claim.statement, &findings)?);

        let verdict = aggregator.aggregate(claim.id, &findings);
        let summary = format!(
            "confidence {:.2}{}{}",
            verdict.confidence,
            if verdict.conflicting { ", conflicting" } else { "" },
            if verdict.accepted { ", accepted" } else { ", rejected" },
        );
        if verdict.accepted {
            println!("{}\n", formatter.success(&summary));
        } else {
            println!("{}\n", formatter.error(&summary));
        }
    }

    if skill.claims.is_empty() {
        println!("{}", formatter.info("draft carries no claims"));
    }

    Ok(())
}
