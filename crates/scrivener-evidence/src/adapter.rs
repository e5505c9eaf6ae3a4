//! The uniform adapter contract over evidence methods

use crate::snapshot::RepoSnapshot;
use async_trait::async_trait;
use scrivener_domain::{ClaimSubject, EvidenceFinding, EvidenceMethod};
use std::time::Duration;
use tracing::warn;

/// Uniform interface over the independent analysis methods
///
/// Contract:
/// - read-only access to the snapshot; a check never mutates anything
/// - a method that cannot run returns an `Unavailable` finding, never a
///   silent `NoMatch`
/// - adapters are independent; no adapter observes another's result
#[async_trait]
pub trait EvidenceAdapter: Send + Sync {
    /// The method this adapter speaks for
    fn method(&self) -> EvidenceMethod;

    /// Check one subject against the snapshot
    async fn check(&self, subject: &ClaimSubject, snapshot: &RepoSnapshot) -> EvidenceFinding;
}

/// Run an adapter check bounded by a per-call timeout
///
/// A timed-out check contributes an `Unavailable` finding rather than
/// blocking the caller's join indefinitely.
pub async fn check_with_timeout(
    adapter: &dyn EvidenceAdapter,
    subject: &ClaimSubject,
    snapshot: &RepoSnapshot,
    limit: Duration,
) -> EvidenceFinding {
    match tokio::time::timeout(limit, adapter.check(subject, snapshot)).await {
        Ok(finding) => finding,
        Err(_) => {
            warn!(
                method = adapter.method().as_str(),
                "evidence check timed out after {:?}", limit
            );
            EvidenceFinding::unavailable(
                adapter.method(),
                format!("check timed out after {}ms", limit.as_millis()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrivener_domain::SymbolLocation;

    struct SlowAdapter;

    #[async_trait]
    impl EvidenceAdapter for SlowAdapter {
        fn method(&self) -> EvidenceMethod {
            EvidenceMethod::SymbolResolution
        }

        async fn check(&self, _subject: &ClaimSubject, _snapshot: &RepoSnapshot) -> EvidenceFinding {
            tokio::time::sleep(Duration::from_secs(60)).await;
            EvidenceFinding::matched(
                self.method(),
                SymbolLocation { line: 1, column: 1 },
                "never reached",
            )
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_unavailable() {
        let adapter = SlowAdapter;
        let snapshot = RepoSnapshot::new("rev1");
        let subject = ClaimSubject::Symbol {
            name: "foo".to_string(),
            path: "f.rs".to_string(),
        };

        let finding =
            check_with_timeout(&adapter, &subject, &snapshot, Duration::from_millis(50)).await;

        assert!(!finding.is_match());
        assert!(!finding.is_no_match());
        assert!(finding.detail.contains("timed out"));
    }
}
