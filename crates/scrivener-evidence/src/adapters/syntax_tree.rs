//! Syntax-tree evidence adapter
//!
//! Highest-trust method (1.00 in the calibration table). The actual tree
//! walking is an external collaborator behind [`SyntaxTreeBackend`];
//! without a backend the adapter reports `Unavailable` for every check.

use crate::adapter::EvidenceAdapter;
use crate::error::BackendError;
use crate::snapshot::RepoSnapshot;
use async_trait::async_trait;
use scrivener_domain::{ClaimSubject, EvidenceFinding, EvidenceMethod, SymbolLocation};
use std::sync::Arc;
use tracing::debug;

/// External syntax-tree walker
///
/// `locate` returns `Ok(None)` when the tree was walked and the subject
/// genuinely is not there - that is a real no-match. Failures to walk at
/// all must come back as `Err`, which the adapter reports as
/// `Unavailable`.
pub trait SyntaxTreeBackend: Send + Sync {
    /// Locate the subject in the snapshot's syntax trees
    fn locate(
        &self,
        subject: &ClaimSubject,
        snapshot: &RepoSnapshot,
    ) -> Result<Option<SymbolLocation>, BackendError>;
}

/// Adapter for the syntax-tree method
pub struct SyntaxTreeAdapter {
    backend: Option<Arc<dyn SyntaxTreeBackend>>,
}

impl SyntaxTreeAdapter {
    /// Create an adapter over a configured backend
    pub fn new(backend: Arc<dyn SyntaxTreeBackend>) -> Self {
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
impl EvidenceAdapter for SyntaxTreeAdapter {
    fn method(&self) -> EvidenceMethod {
        EvidenceMethod::SyntaxTree
    }

    async fn check(&self, subject: &ClaimSubject, snapshot: &RepoSnapshot) -> EvidenceFinding {
        let Some(backend) = &self.backend else {
            return EvidenceFinding::unavailable(self.method(), "no syntax-tree backend configured");
        };

        match backend.locate(subject, snapshot) {
            Ok(Some(location)) => {
                debug!(
                    path = subject.path(),
                    line = location.line,
                    "syntax-tree match"
                );
                EvidenceFinding::matched(
                    self.method(),
                    location,
                    format!("syntax node at {}:{}", subject.path(), location.line),
                )
            }
            Ok(None) => EvidenceFinding::no_match(
                self.method(),
                format!("no syntax node for subject in {}", subject.path()),
            ),
            Err(e) => EvidenceFinding::unavailable(self.method(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend(Option<SymbolLocation>);

    impl SyntaxTreeBackend for FixedBackend {
        fn locate(
            &self,
            _subject: &ClaimSubject,
            _snapshot: &RepoSnapshot,
        ) -> Result<Option<SymbolLocation>, BackendError> {
            Ok(self.0)
        }
    }

    struct BrokenBackend;

    impl SyntaxTreeBackend for BrokenBackend {
        fn locate(
            &self,
            _subject: &ClaimSubject,
            _snapshot: &RepoSnapshot,
        ) -> Result<Option<SymbolLocation>, BackendError> {
            Err(BackendError::new("tree-sitter grammar missing"))
        }
    }

    fn subject() -> ClaimSubject {
        ClaimSubject::Symbol {
            name: "foo".to_string(),
            path: "file.py".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_is_unavailable() {
        let adapter = SyntaxTreeAdapter::unconfigured();
        let finding = adapter.check(&subject(), &RepoSnapshot::new("r")).await;
        assert!(!finding.is_match());
        assert!(!finding.is_no_match());
    }

    #[tokio::test]
    async fn test_backend_match() {
        let adapter = SyntaxTreeAdapter::new(Arc::new(FixedBackend(Some(SymbolLocation {
            line: 10,
            column: 5,
        }))));
        let finding = adapter.check(&subject(), &RepoSnapshot::new("r")).await;
        assert!(finding.is_match());
        assert_eq!(finding.trust_level, 1.00);
    }

    #[tokio::test]
    async fn test_backend_no_match() {
        let adapter = SyntaxTreeAdapter::new(Arc::new(FixedBackend(None)));
        let finding = adapter.check(&subject(), &RepoSnapshot::new("r")).await;
        assert!(finding.is_no_match());
    }

    #[tokio::test]
    async fn test_backend_error_is_unavailable() {
        let adapter = SyntaxTreeAdapter::new(Arc::new(BrokenBackend));
        let finding = adapter.check(&subject(), &RepoSnapshot::new("r")).await;
        assert!(!finding.is_match());
        assert!(!finding.is_no_match());
        assert!(finding.detail.contains("grammar missing"));
    }
}
