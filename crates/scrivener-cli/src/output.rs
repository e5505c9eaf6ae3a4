//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use scrivener_domain::{AggregatedVerdict, EvidenceFinding, FindingStatus, StageResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format per-claim verdicts.
    pub fn format_verdicts(&self, verdicts: &[(String, AggregatedVerdict)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_verdicts_json(verdicts),
            OutputFormat::Table => self.format_verdicts_table(verdicts),
            OutputFormat::Quiet => Ok(verdicts
                .iter()
                .map(|(_, v)| format!("{} {}", v.claim_id, if v.accepted { "ok" } else { "rejected" }))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_verdicts_json(&self, verdicts: &[(String, AggregatedVerdict)]) -> Result<String> {
        let json: Vec<serde_json::Value> = verdicts
            .iter()
            .map(|(statement, v)| {
                serde_json::json!({
                    "claim_id": v.claim_id.to_string(),
                    "statement": statement,
                    "accepted": v.accepted,
                    "confidence": v.confidence,
                    "conflicting": v.conflicting,
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_verdicts_table(&self, verdicts: &[(String, AggregatedVerdict)]) -> Result<String> {
        if verdicts.is_empty() {
            return Ok(self.colorize("No claims audited.", "yellow"));
        }

        let mut builder = Builder::default();
        builder.push_record(["Claim", "Statement", "Accepted", "Confidence", "Conflicting"]);

        for (statement, verdict) in verdicts {
            builder.push_record([
                &verdict.claim_id.to_string()[..8],
                statement,
                if verdict.accepted { "yes" } else { "no" },
                &format!("{:.2}", verdict.confidence),
                if verdict.conflicting { "yes" } else { "" },
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format the per-method findings for one claim.
    pub fn format_findings(&self, statement: &str, findings: &[EvidenceFinding]) -> Result<String> {
        if matches!(self.format, OutputFormat::Json) {
            let json: Vec<serde_json::Value> = findings
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "method": f.method.as_str(),
                        "status": match &f.status {
                            FindingStatus::Matched { .. } => "matched",
                            FindingStatus::NoMatch => "no-match",
                            FindingStatus::Unavailable { .. } => "unavailable",
                        },
                        "trust_level": f.trust_level,
                        "detail": f.detail,
                    })
                })
                .collect();
            return Ok(serde_json::to_string_pretty(&serde_json::json!({
                "statement": statement,
                "findings": json,
            }))?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Method", "Trust", "Status", "Detail"]);
        for finding in findings {
            let status = match &finding.status {
                FindingStatus::Matched { location } => {
                    format!("matched @ {}:{}", location.line, location.column)
                }
                FindingStatus::NoMatch => "no match".to_string(),
                FindingStatus::Unavailable { .. } => "unavailable".to_string(),
            };
            builder.push_record([
                finding.method.as_str(),
                &format!("{:.2}", finding.trust_level),
                &status,
                &finding.detail,
            ]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        Ok(format!("{}\n{}", self.colorize(statement, "cyan"), table))
    }

    /// Format a run's history trail.
    pub fn format_history(&self, history: &[StageResult]) -> Result<String> {
        if matches!(self.format, OutputFormat::Json) {
            let json: Vec<serde_json::Value> = history
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "stage": r.stage.as_str(),
                        "attempt": r.attempt,
                        "success": r.success,
                        "error": r.error.as_ref().map(|e| {
                            serde_json::json!({
                                "kind": e.kind.as_str(),
                                "message": e.message,
                            })
                        }),
                    })
                })
                .collect();
            return Ok(serde_json::to_string_pretty(&json)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Stage", "Attempt", "Outcome", "Error"]);
        for result in history {
            builder.push_record([
                result.stage.as_str(),
                &result.attempt.to_string(),
                if result.success { "ok" } else { "failed" },
                &result
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        Ok(table.to_string())
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
