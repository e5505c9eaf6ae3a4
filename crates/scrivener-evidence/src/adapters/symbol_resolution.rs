//! Symbol-resolution evidence adapter (trust 0.90)
//!
//! Backed by a language-server client. A missing or unconfigured
//! language server is the common case in CI, which is exactly why
//! unavailability is a first-class finding here.

use crate::adapter::EvidenceAdapter;
use crate::error::BackendError;
use crate::snapshot::RepoSnapshot;
use async_trait::async_trait;
use scrivener_domain::{ClaimSubject, EvidenceFinding, EvidenceMethod, SymbolLocation};
use std::sync::Arc;

/// External symbol resolver (language-server client)
pub trait SymbolResolutionBackend: Send + Sync {
    /// Resolve the subject to a definition site
    fn locate(
        &self,
        subject: &ClaimSubject,
        snapshot: &RepoSnapshot,
    ) -> Result<Option<SymbolLocation>, BackendError>;
}

/// Adapter for the symbol-resolution method
pub struct SymbolResolutionAdapter {
    backend: Option<Arc<dyn SymbolResolutionBackend>>,
}

impl SymbolResolutionAdapter {
    /// Create an adapter over a configured backend
    pub fn new(backend: Arc<dyn SymbolResolutionBackend>) -> Self {
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
impl EvidenceAdapter for SymbolResolutionAdapter {
    fn method(&self) -> EvidenceMethod {
        EvidenceMethod::SymbolResolution
    }

    async fn check(&self, subject: &ClaimSubject, snapshot: &RepoSnapshot) -> EvidenceFinding {
        let Some(backend) = &self.backend else {
            return EvidenceFinding::unavailable(self.method(), "no language server configured");
        };

        match backend.locate(subject, snapshot) {
            Ok(Some(location)) => EvidenceFinding::matched(
                self.method(),
                location,
                format!("resolved to {}:{}", subject.path(), location.line),
            ),
            Ok(None) => EvidenceFinding::no_match(
                self.method(),
                format!("symbol does not resolve in {}", subject.path()),
            ),
            Err(e) => EvidenceFinding::unavailable(self.method(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_mentions_language_server() {
        let adapter = SymbolResolutionAdapter::unconfigured();
        let subject = ClaimSubject::Symbol {
            name: "resolve_me".to_string(),
            path: "mod.rs".to_string(),
        };
        let finding = adapter.check(&subject, &RepoSnapshot::new("r")).await;
        assert!(finding.detail.contains("language server"));
    }
}
