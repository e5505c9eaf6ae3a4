//! Scrivener Evidence Layer
//!
//! Uniform adapters over the independent analysis methods used to
//! corroborate claims: syntax-tree match, grammar-parser match,
//! language-server symbol resolution, and textual search.
//!
//! Adapters are independent and may be unavailable; an adapter that
//! cannot run (no backend configured, timed out) produces an explicit
//! `Unavailable` finding so the aggregator can tell "checked, no match"
//! apart from "not checked". All access to the repository snapshot is
//! read-only.
//!
//! # Examples
//!
//! ```
//! use scrivener_evidence::{RepoSnapshot, TextualSearchAdapter, EvidenceAdapter};
//! use scrivener_domain::ClaimSubject;
//!
//! # tokio_test::block_on(async {
//! let snapshot = RepoSnapshot::new("rev1")
//!     .with_file("file.py", "import os\n\ndef foo():\n    pass\n");
//!
//! let adapter = TextualSearchAdapter::new();
//! let subject = ClaimSubject::Symbol {
//!     name: "foo".to_string(),
//!     path: "file.py".to_string(),
//! };
//! let finding = adapter.check(&subject, &snapshot).await;
//! assert!(finding.is_match());
//! # });
//! ```

#![warn(missing_docs)]

mod adapter;
mod error;
mod snapshot;

pub mod adapters;

pub use adapter::{check_with_timeout, EvidenceAdapter};
pub use adapters::grammar_parser::{GrammarParserAdapter, GrammarParserBackend};
pub use adapters::symbol_resolution::{SymbolResolutionAdapter, SymbolResolutionBackend};
pub use adapters::syntax_tree::{SyntaxTreeAdapter, SyntaxTreeBackend};
pub use adapters::textual_search::TextualSearchAdapter;
pub use adapters::default_adapters;
pub use error::{BackendError, EvidenceError};
pub use snapshot::RepoSnapshot;
