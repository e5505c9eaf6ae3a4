//! Evidence layer error types

use thiserror::Error;

/// Errors that can occur in the evidence layer
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Snapshot could not be loaded
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// I/O error while materializing a snapshot
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error reported by an evidence backend
///
/// Backends are external collaborators; their failures surface as
/// `Unavailable` findings, never as a silent no-match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    /// Create a backend error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
