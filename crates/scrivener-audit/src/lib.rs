//! Scrivener Audit Layer
//!
//! Turns independent, imperfect evidence findings into one calibrated
//! trust decision per claim, and bounds the fraction of ungrounded
//! claims per run:
//!
//! - [`TrustAggregator`] combines per-claim findings into an
//!   [`AggregatedVerdict`](scrivener_domain::AggregatedVerdict)
//! - [`HallucinationGate`] accumulates verdicts on the run's own
//!   `HallMetric` and applies the threshold
//! - [`Auditor`] fans claims out across the evidence adapters under a
//!   bounded worker pool
//! - [`AuditExecutor`] is the Auditing stage implementation the
//!   supervisor dispatches to - the only stage with core-owned logic
//!
//! # Examples
//!
//! ```
//! use scrivener_audit::{AuditConfig, TrustAggregator};
//! use scrivener_domain::{ClaimId, EvidenceFinding, EvidenceMethod, SymbolLocation};
//!
//! let aggregator = TrustAggregator::new(&AuditConfig::default());
//! let findings = vec![EvidenceFinding::matched(
//!     EvidenceMethod::SyntaxTree,
//!     SymbolLocation { line: 10, column: 1 },
//!     "def foo()",
//! )];
//! let verdict = aggregator.aggregate(ClaimId::new(), &findings);
//! assert!(verdict.accepted);
//! ```

#![warn(missing_docs)]

mod aggregator;
mod auditor;
mod config;
mod error;
mod executor;
mod gate;

pub use aggregator::{best_match, TrustAggregator};
pub use auditor::{AuditOutcome, Auditor};
pub use config::AuditConfig;
pub use error::AuditError;
pub use executor::AuditExecutor;
pub use gate::{GateDecision, HallucinationGate};
