//! Pipeline error types

use scrivener_domain::WorkflowStage;
use thiserror::Error;

/// Errors raised while wiring or validating a supervisor
///
/// These are configuration problems, which is why the supervisor folds
/// them into a `FatalConfig` stage failure rather than retrying.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No executor registered for a stage the pipeline must visit
    #[error("No executor registered for stage '{0}'")]
    MissingExecutor(WorkflowStage),

    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(String),
}
