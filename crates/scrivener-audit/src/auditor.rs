//! The auditor: per-claim evidence fan-out under a bounded pool

use crate::aggregator::{best_match, TrustAggregator};
use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::gate::{GateDecision, HallucinationGate};
use futures::future::join_all;
use futures::StreamExt;
use scrivener_evidence::{check_with_timeout, EvidenceAdapter, RepoSnapshot};
use scrivener_domain::{
    AggregatedVerdict, Claim, EvidenceFinding, FindingStatus, SourceRef,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything one audit pass produced
#[derive(Debug)]
pub struct AuditOutcome {
    /// One verdict per claim, in claim order
    pub verdicts: Vec<AggregatedVerdict>,

    /// Evidence-backed citations for the accepted claims
    pub citations: Vec<SourceRef>,

    /// The gate's decision over the whole pass
    pub decision: GateDecision,
}

/// Evidence-checks a draft's claims and applies the gate
///
/// For each claim, every adapter is invoked concurrently (fork) and the
/// aggregator only runs once all of them have returned or timed out
/// (join). Claims themselves are evaluated concurrently, bounded by
/// `max_concurrent_claims` to cap resource usage.
pub struct Auditor {
    adapters: Vec<Arc<dyn EvidenceAdapter>>,
    aggregator: TrustAggregator,
    config: AuditConfig,
}

impl Auditor {
    /// Create an auditor over the given adapters
    pub fn new(
        adapters: Vec<Arc<dyn EvidenceAdapter>>,
        config: AuditConfig,
    ) -> Result<Self, AuditError> {
        config.validate().map_err(AuditError::Config)?;
        if adapters.is_empty() {
            return Err(AuditError::NoAdapters);
        }
        Ok(Self {
            aggregator: TrustAggregator::new(&config),
            adapters,
            config,
        })
    }

    /// The audit configuration
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Evidence-check every claim, record verdicts on the gate, and
    /// decide once all claims have joined
    pub async fn audit(
        &self,
        claims: &[Claim],
        snapshot: &RepoSnapshot,
        gate: &HallucinationGate,
    ) -> AuditOutcome {
        info!(
            claims = claims.len(),
            adapters = self.adapters.len(),
            "audit pass started"
        );

        let checks: Vec<_> = claims
            .iter()
            .map(|claim| self.evaluate(claim, snapshot, gate))
            .collect();
        let results: Vec<(AggregatedVerdict, Option<SourceRef>)> =
            futures::stream::iter(checks)
                .buffered(self.config.max_concurrent_claims)
                .collect()
                .await;

        // The decision is taken exactly once, after the join
        let decision = gate.decide();

        let mut verdicts = Vec::with_capacity(results.len());
        let mut citations = Vec::new();
        for (verdict, citation) in results {
            verdicts.push(verdict);
            citations.extend(citation);
        }

        info!(
            accepted = verdicts.iter().filter(|v| v.accepted).count(),
            rejected = verdicts.iter().filter(|v| !v.accepted).count(),
            hall_m = decision.hall_m,
            accept = decision.accept,
            "audit pass finished"
        );

        AuditOutcome {
            verdicts,
            citations,
            decision,
        }
    }

    /// Fork all adapters for one claim, join, aggregate, record
    async fn evaluate(
        &self,
        claim: &Claim,
        snapshot: &RepoSnapshot,
        gate: &HallucinationGate,
    ) -> (AggregatedVerdict, Option<SourceRef>) {
        let timeout = self.config.adapter_timeout();
        let checks = self
            .adapters
            .iter()
            .map(|adapter| check_with_timeout(adapter.as_ref(), &claim.subject, snapshot, timeout));

        let findings: Vec<EvidenceFinding> = join_all(checks).await;
        debug!(claim_id = %claim.id, findings = findings.len(), "evidence joined");

        let verdict = self.aggregator.aggregate(claim.id, &findings);
        gate.record(&verdict);

        let citation = if verdict.accepted {
            best_match(&findings).and_then(|f| match &f.status {
                FindingStatus::Matched { location } => Some(SourceRef::new(
                    claim.subject.path(),
                    *location,
                    snapshot.revision(),
                    f.method,
                )),
                _ => None,
            })
        } else {
            None
        };

        (verdict, citation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use scrivener_domain::{ClaimSubject, EvidenceMethod, HallMetric, SymbolLocation};
    use scrivener_evidence::{SyntaxTreeAdapter, SyntaxTreeBackend, TextualSearchAdapter};

    /// Syntax-tree stand-in that treats `def <name>` lines as definitions
    struct DefLineBackend;

    impl SyntaxTreeBackend for DefLineBackend {
        fn locate(
            &self,
            subject: &ClaimSubject,
            snapshot: &RepoSnapshot,
        ) -> Result<Option<SymbolLocation>, scrivener_evidence::BackendError> {
            let ClaimSubject::Symbol { name, path } = subject else {
                return Ok(None);
            };
            let Some(content) = snapshot.file(path) else {
                return Ok(None);
            };
            for (idx, line) in content.lines().enumerate() {
                if line.trim_start().starts_with(&format!("def {}(", name)) {
                    return Ok(Some(SymbolLocation {
                        line: idx as u32 + 1,
                        column: line.find("def").unwrap_or(0) as u32 + 1,
                    }));
                }
            }
            Ok(None)
        }
    }

    fn adapters() -> Vec<Arc<dyn EvidenceAdapter>> {
        vec![
            Arc::new(SyntaxTreeAdapter::new(Arc::new(DefLineBackend))),
            Arc::new(TextualSearchAdapter::new()),
        ]
    }

    fn gate() -> HallucinationGate {
        HallucinationGate::new(Arc::new(HallMetric::new()), 0.02)
    }

    fn claim(name: &str, path: &str) -> Claim {
        Claim::new(
            ClaimSubject::Symbol {
                name: name.to_string(),
                path: path.to_string(),
            },
            format!("`{}` is defined in {}", name, path),
        )
    }

    #[tokio::test]
    async fn test_grounded_claim_passes_gate() {
        // `foo` really is defined at file.py line 3
        let snapshot =
            RepoSnapshot::new("rev1").with_file("file.py", "import os\n\ndef foo():\n    pass\n");
        let auditor = Auditor::new(adapters(), AuditConfig::default()).unwrap();
        let gate = gate();

        let outcome = auditor.audit(&[claim("foo", "file.py")], &snapshot, &gate).await;

        assert!(outcome.decision.accept);
        assert_eq!(outcome.decision.hall_m, 0.0);
        assert_eq!(outcome.verdicts.len(), 1);
        assert!(outcome.verdicts[0].accepted);
        // Syntax tree outranks textual search for the citation
        assert_eq!(outcome.citations.len(), 1);
        assert_eq!(outcome.citations[0].method, EvidenceMethod::SyntaxTree);
        assert_eq!(outcome.citations[0].line, 3);
        assert_eq!(outcome.citations[0].trust_level, 1.00);
    }

    #[tokio::test]
    async fn test_fabricated_claim_trips_gate() {
        let snapshot =
            RepoSnapshot::new("rev1").with_file("file.py", "import os\n\ndef foo():\n    pass\n");
        let auditor = Auditor::new(adapters(), AuditConfig::default()).unwrap();
        let gate = gate();

        let outcome = auditor
            .audit(&[claim("phantom_fn", "file.py")], &snapshot, &gate)
            .await;

        assert!(!outcome.decision.accept);
        assert_eq!(outcome.decision.hall_m, 1.0);
        assert!(!outcome.verdicts[0].accepted);
        assert!(outcome.citations.is_empty());
    }

    #[tokio::test]
    async fn test_mixed_claims_ratio() {
        let snapshot = RepoSnapshot::new("rev1").with_file(
            "mod.py",
            "def alpha():\n    pass\n\ndef beta():\n    pass\n",
        );
        let auditor = Auditor::new(adapters(), AuditConfig::default()).unwrap();
        let gate = gate();

        let claims = vec![
            claim("alpha", "mod.py"),
            claim("beta", "mod.py"),
            claim("gamma", "mod.py"),
        ];
        let outcome = auditor.audit(&claims, &snapshot, &gate).await;

        assert!((outcome.decision.hall_m - 1.0 / 3.0).abs() < 1e-9);
        assert!(!outcome.decision.accept);
        assert_eq!(outcome.citations.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_claim_set_accepts() {
        let snapshot = RepoSnapshot::new("rev1");
        let auditor = Auditor::new(adapters(), AuditConfig::default()).unwrap();
        let gate = gate();

        let outcome = auditor.audit(&[], &snapshot, &gate).await;

        assert!(outcome.decision.accept);
        assert_eq!(outcome.decision.hall_m, 0.0);
        assert!(outcome.verdicts.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_audits_do_not_share_counters() {
        let good_snapshot = RepoSnapshot::new("rev1").with_file("a.py", "def real():\n    pass\n");
        let bad_snapshot = RepoSnapshot::new("rev1").with_file("b.py", "# nothing here\n");

        let auditor = Auditor::new(adapters(), AuditConfig::default()).unwrap();
        let gate_good = gate();
        let gate_bad = gate();

        let good_claims: Vec<Claim> = (0..5).map(|_| claim("real", "a.py")).collect();
        let bad_claims: Vec<Claim> = (0..5).map(|_| claim("fake", "b.py")).collect();

        let (good, bad) = tokio::join!(
            auditor.audit(&good_claims, &good_snapshot, &gate_good),
            auditor.audit(&bad_claims, &bad_snapshot, &gate_bad),
        );

        assert_eq!(good.decision.hall_m, 0.0);
        assert_eq!(bad.decision.hall_m, 1.0);
    }

    #[tokio::test]
    async fn test_no_adapters_is_an_error() {
        assert!(matches!(
            Auditor::new(vec![], AuditConfig::default()),
            Err(AuditError::NoAdapters)
        ));
    }
}
