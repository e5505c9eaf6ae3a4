//! Audit error types

use thiserror::Error;

/// Errors that can occur during audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// No adapters registered; an audit with nothing to consult would
    /// reject every claim without ever checking anything
    #[error("No evidence adapters registered")]
    NoAdapters,
}
