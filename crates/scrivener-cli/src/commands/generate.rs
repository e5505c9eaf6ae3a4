//! The generate command: drive a full pipeline run from a draft file.

use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::draft::DraftFile;
use crate::error::Result;
use crate::output::Formatter;
use crate::stages::{LinkingStage, MiningStage, VerifyStage, WritingStage};
use scrivener_audit::{AuditExecutor, Auditor};
use scrivener_domain::{Artifact, WorkflowStage};
use scrivener_evidence::{default_adapters, RepoSnapshot};
use scrivener_ledger::{InMemoryLedger, MemorySink, StoreExecutor};
use scrivener_pipeline::{MinClaimsCriterion, PipelineConfig, Supervisor};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Run the pipeline to a terminal state; returns true on COMPLETE.
pub async fn execute_generate(
    args: GenerateArgs,
    config: &Config,
    api_key: Option<&str>,
    formatter: &Formatter,
) -> Result<bool> {
    let snapshot = Arc::new(RepoSnapshot::from_dir(&args.source_dir, "workdir")?);
    let draft = DraftFile::load(&args.draft)?;

    let mut audit_config = config.audit.clone();
    if let Some(threshold) = args.threshold {
        audit_config.threshold = threshold;
    }
    let pipeline_config = PipelineConfig {
        max_retries: args.max_retries.unwrap_or(config.pipeline.max_retries),
        max_regeneration_retries: args
            .max_regenerations
            .unwrap_or(config.pipeline.max_regeneration_retries),
        ..config.pipeline.clone()
    };

    if api_key.is_none() {
        debug!("no API key configured; external agents replaced by file-backed stages");
    }

    let auditor = Auditor::new(default_adapters(), audit_config)?;
    let ledger = Arc::new(InMemoryLedger::new());
    let sink = Arc::new(Mutex::new(MemorySink::new()));

    let mut supervisor = Supervisor::new(pipeline_config)
        .register(Arc::new(MiningStage::new(snapshot.clone())))
        .register(Arc::new(LinkingStage::new(snapshot.clone(), draft.clone())))
        .register(Arc::new(WritingStage::new(draft.clone())))
        .register(Arc::new(AuditExecutor::new(auditor, snapshot.clone())))
        .register(Arc::new(VerifyStage::new(snapshot.clone())))
        .register(Arc::new(StoreExecutor::new(ledger, sink.clone())));

    if let Some(min) = args.min_claims {
        supervisor = supervisor.with_criterion(Arc::new(MinClaimsCriterion::new(min)));
    }

    let run = supervisor.run(&draft.skill_id).await;

    println!("{}", formatter.format_history(run.history())?);

    if run.stage() != WorkflowStage::Complete {
        let reason = run
            .terminal_error()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("{}", formatter.error(&format!("run failed: {}", reason)));
        return Ok(false);
    }

    let (record_id, deduplicated) = match run.stored_record() {
        Some((id, dedup)) => (id.to_string(), dedup),
        None => {
            println!("{}", formatter.error("run completed without a stored record"));
            return Ok(false);
        }
    };

    println!(
        "{}",
        formatter.success(&format!(
            "skill '{}' stored as {}{} (hall_m {:.4})",
            draft.skill_id,
            record_id,
            if deduplicated { ", deduplicated" } else { "" },
            run.hall_metric().hall_m(),
        ))
    );

    if let Some(output) = &args.output {
        write_output(output, &run, &record_id, &sink)?;
        println!("{}", formatter.info(&format!("wrote {}", output.display())));
    }

    Ok(true)
}

/// Write the committed skill and its citations to a JSON file.
fn write_output(
    path: &std::path::Path,
    run: &scrivener_pipeline::PipelineRun,
    record_id: &str,
    sink: &Arc<Mutex<MemorySink>>,
) -> Result<()> {
    let citations: Vec<serde_json::Value> = run
        .history()
        .iter()
        .rev()
        .filter(|r| r.success)
        .flat_map(|r| r.artifacts.iter())
        .find_map(|a| match a {
            Artifact::Citations(refs) => Some(refs),
            _ => None,
        })
        .map(|refs| {
            refs.iter()
                .map(|c| {
                    serde_json::json!({
                        "path": c.path,
                        "line": c.line,
                        "column": c.column,
                        "revision_id": c.revision_id,
                        "method": c.method.as_str(),
                        "trust_level": c.trust_level,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let body = sink
        .lock()
        .map_err(|_| crate::error::CliError::Config("sink lock poisoned".to_string()))?
        .body(record_id)
        .map(str::to_string)
        .unwrap_or_default();

    let document = serde_json::json!({
        "record_id": record_id,
        "skill_id": run.skill_id(),
        "body": body,
        "hall_m": run.hall_metric().hall_m(),
        "citations": citations,
    });

    std::fs::write(path, serde_json::to_string_pretty(&document)?)?;
    Ok(())
}
