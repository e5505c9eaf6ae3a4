//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Draft file could not be read or parsed
    #[error("Draft error: {0}")]
    Draft(String),

    /// Snapshot could not be materialized
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] scrivener_evidence::EvidenceError),

    /// Audit wiring error
    #[error("Audit error: {0}")]
    Audit(#[from] scrivener_audit::AuditError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
