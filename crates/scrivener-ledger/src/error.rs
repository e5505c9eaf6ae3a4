//! Ledger error types

use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The underlying persistence sink failed
    #[error("Sink error: {0}")]
    Sink(String),

    /// The ledger's lock was poisoned by a panicking writer
    #[error("Ledger lock poisoned")]
    Lock,
}
