//! Grammar-parser evidence adapter (trust 0.95)

use crate::adapter::EvidenceAdapter;
use crate::error::BackendError;
use crate::snapshot::RepoSnapshot;
use async_trait::async_trait;
use scrivener_domain::{ClaimSubject, EvidenceFinding, EvidenceMethod, SymbolLocation};
use std::sync::Arc;

/// External grammar-based multi-language parser
pub trait GrammarParserBackend: Send + Sync {
    /// Locate the subject via grammar-level parsing
    fn locate(
        &self,
        subject: &ClaimSubject,
        snapshot: &RepoSnapshot,
    ) -> Result<Option<SymbolLocation>, BackendError>;
}

/// Adapter for the grammar-parser method
pub struct GrammarParserAdapter {
    backend: Option<Arc<dyn GrammarParserBackend>>,
}

impl GrammarParserAdapter {
    /// Create an adapter over a configured backend
    pub fn new(backend: Arc<dyn GrammarParserBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Create an adapter with no backend; every check is `Unavailable`
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }
}

#[async_trait]
impl EvidenceAdapter for GrammarParserAdapter {
    fn method(&self) -> EvidenceMethod {
        EvidenceMethod::GrammarParser
    }

    async fn check(&self, subject: &ClaimSubject, snapshot: &RepoSnapshot) -> EvidenceFinding {
        let Some(backend) = &self.backend else {
            return EvidenceFinding::unavailable(self.method(), "no grammar-parser backend configured");
        };

        match backend.locate(subject, snapshot) {
            Ok(Some(location)) => EvidenceFinding::matched(
                self.method(),
                location,
                format!("parsed match at {}:{}", subject.path(), location.line),
            ),
            Ok(None) => EvidenceFinding::no_match(
                self.method(),
                format!("parser found no match in {}", subject.path()),
            ),
            Err(e) => EvidenceFinding::unavailable(self.method(), e.to_string()),
        }
    }
}
