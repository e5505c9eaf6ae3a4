//! The four evidence method adapters

pub mod grammar_parser;
pub mod symbol_resolution;
pub mod syntax_tree;
pub mod textual_search;

use crate::adapter::EvidenceAdapter;
use std::sync::Arc;

/// The standard adapter set: textual search active, the backend-based
/// methods unconfigured until a backend is supplied
///
/// Unconfigured adapters still participate in every check and report
/// `Unavailable`, which keeps the audit trail honest about what was and
/// was not consulted.
pub fn default_adapters() -> Vec<Arc<dyn EvidenceAdapter>> {
    vec![
        Arc::new(syntax_tree::SyntaxTreeAdapter::unconfigured()),
        Arc::new(grammar_parser::GrammarParserAdapter::unconfigured()),
        Arc::new(symbol_resolution::SymbolResolutionAdapter::unconfigured()),
        Arc::new(textual_search::TextualSearchAdapter::new()),
    ]
}
