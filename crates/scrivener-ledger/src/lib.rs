//! Scrivener Ledger Layer
//!
//! The write-side of the pipeline: an idempotency ledger keyed by
//! `skill_id + content_hash` with atomic check-and-insert semantics, the
//! persistence sink seam, and the Storing stage executor built on both.
//! A retried Store never creates a duplicate record; re-submission of a
//! known key returns the original record id.

#![warn(missing_docs)]

mod error;
mod executor;
mod ledger;
mod sink;

pub use error::LedgerError;
pub use executor::StoreExecutor;
pub use ledger::{IdempotencyKey, InMemoryLedger};
pub use sink::MemorySink;
