//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scrivener - generate evidence-grounded documentation skills from
/// source code.
#[derive(Debug, Parser)]
#[command(name = "scrivener")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key for external generation agents
    #[arg(long, env = "SCRIVENER_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (minimal)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full generation pipeline for one skill
    Generate(GenerateArgs),

    /// Audit a draft's claims and report the gate decision
    Verify(VerifyArgs),

    /// Show per-claim evidence findings without gating
    Analyze(AnalyzeArgs),
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Source directory to snapshot
    pub source_dir: PathBuf,

    /// Draft skill file (JSON) standing in for the generation agents
    #[arg(short, long)]
    pub draft: PathBuf,

    /// Hallucination threshold override
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Transient retry budget per stage
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Regeneration budget for audit rejections
    #[arg(long)]
    pub max_regenerations: Option<u32>,

    /// Require at least this many claims (and accepted verdicts) before
    /// the run may complete
    #[arg(long)]
    pub min_claims: Option<usize>,

    /// Write the committed skill to this file on success
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the verify command.
#[derive(Debug, Parser)]
pub struct VerifyArgs {
    /// Source directory to snapshot
    pub source_dir: PathBuf,

    /// Draft skill file (JSON) whose claims should be audited
    #[arg(short, long)]
    pub draft: PathBuf,

    /// Hallucination threshold override
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Source directory to snapshot
    pub source_dir: PathBuf,

    /// Draft skill file (JSON) whose claims should be checked
    #[arg(short, long)]
    pub draft: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_command() {
        let cli = Cli::parse_from([
            "scrivener",
            "generate",
            "src/",
            "--draft",
            "draft.json",
            "--threshold",
            "0.05",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.threshold, Some(0.05));
                assert_eq!(args.draft, PathBuf::from("draft.json"));
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_verify_command() {
        let cli = Cli::parse_from(["scrivener", "verify", "src/", "--draft", "d.json"]);
        assert!(matches!(cli.command, Command::Verify(_)));
    }

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from(["scrivener", "analyze", "src/", "--draft", "d.json"]);
        assert!(matches!(cli.command, Command::Analyze(_)));
    }
}
