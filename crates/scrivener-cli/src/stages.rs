//! File-backed stage executors.
//!
//! Stand-ins for the external generation agents (Miner/Linker/Writer/
//! Verifier) so the whole pipeline - including the real audit, gate,
//! and ledger - runs locally from a draft file.

use crate::draft::DraftFile;
use async_trait::async_trait;
use scrivener_domain::result::SymbolLink;
use scrivener_domain::traits::SandboxRunner;
use scrivener_domain::{
    Artifact, ClaimSubject, FindingStatus, SourceRef, StageError, StageResult, WorkflowStage,
};
use scrivener_evidence::{EvidenceAdapter, RepoSnapshot, TextualSearchAdapter};
use scrivener_pipeline::{StageContext, StageExecutor};
use std::sync::Arc;
use tracing::debug;

/// Mining: the source set is simply every file in the snapshot.
pub struct MiningStage {
    snapshot: Arc<RepoSnapshot>,
}

impl MiningStage {
    /// Create the stage over the run's snapshot.
    pub fn new(snapshot: Arc<RepoSnapshot>) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl StageExecutor for MiningStage {
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Mining
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let paths = self.snapshot.file_paths();
        if paths.is_empty() {
            return ctx.fail(StageError::structural("snapshot holds no source files"));
        }
        debug!(files = paths.len(), "mined source set");
        ctx.ok(vec![Artifact::SourceSet(paths)])
    }
}

/// Linking: resolve the draft's subjects to candidate locations with a
/// textual pre-pass.
pub struct LinkingStage {
    snapshot: Arc<RepoSnapshot>,
    draft: DraftFile,
    searcher: TextualSearchAdapter,
}

impl LinkingStage {
    /// Create the stage over the run's snapshot and draft.
    pub fn new(snapshot: Arc<RepoSnapshot>, draft: DraftFile) -> Self {
        Self {
            snapshot,
            draft,
            searcher: TextualSearchAdapter::new(),
        }
    }
}

#[async_trait]
impl StageExecutor for LinkingStage {
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Linking
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let mut links = Vec::new();
        for spec in &self.draft.claims {
            let subject: ClaimSubject = spec.subject.clone().into();
            let finding = self.searcher.check(&subject, &self.snapshot).await;

            let candidates = match finding.status {
                FindingStatus::Matched { location } => vec![SourceRef::new(
                    subject.path(),
                    location,
                    self.snapshot.revision(),
                    finding.method,
                )],
                _ => Vec::new(),
            };
            links.push(SymbolLink {
                subject,
                candidates,
            });
        }

        debug!(linked = links.len(), "linked draft subjects");
        ctx.ok(vec![Artifact::SymbolMap(links)])
    }
}

/// Writing: materialize the draft file as the run's skill draft.
pub struct WritingStage {
    draft: DraftFile,
}

impl WritingStage {
    /// Create the stage over the draft file.
    pub fn new(draft: DraftFile) -> Self {
        Self { draft }
    }
}

#[async_trait]
impl StageExecutor for WritingStage {
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Writing
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let mut skill = self.draft.to_skill_draft();

        // Attach the Linker's candidates to the matching claims
        if let Some(symbol_map) = ctx.latest_symbol_map() {
            for claim in &mut skill.claims {
                if let Some(link) = symbol_map.iter().find(|l| l.subject == claim.subject) {
                    claim.candidates = link.candidates.clone();
                }
            }
        }

        ctx.ok(vec![Artifact::Draft(skill)])
    }
}

/// Sandbox stand-in for when no runner is configured.
///
/// Never invoked; VerifyStage skips execution checks without a sandbox.
pub struct NoSandbox;

impl SandboxRunner for NoSandbox {
    type Error = std::convert::Infallible;

    fn run(&self, _code: &str) -> Result<scrivener_domain::traits::ExecOutcome, Self::Error> {
        Ok(scrivener_domain::traits::ExecOutcome {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Verifying: re-resolve the accepted citations against the snapshot
/// and, when a sandbox is configured, execute the skill's fenced code
/// blocks.
pub struct VerifyStage<R = NoSandbox> {
    snapshot: Arc<RepoSnapshot>,
    sandbox: Option<R>,
}

impl VerifyStage<NoSandbox> {
    /// Create the stage without sandbox execution.
    pub fn new(snapshot: Arc<RepoSnapshot>) -> Self {
        Self {
            snapshot,
            sandbox: None,
        }
    }
}

impl<R> VerifyStage<R>
where
    R: SandboxRunner,
{
    /// Create the stage with a sandbox for "runs correctly" checks.
    pub fn with_sandbox(snapshot: Arc<RepoSnapshot>, sandbox: R) -> Self {
        Self {
            snapshot,
            sandbox: Some(sandbox),
        }
    }
}

#[async_trait]
impl<R> StageExecutor for VerifyStage<R>
where
    R: SandboxRunner + Send + Sync + 'static,
    R::Error: std::fmt::Display,
{
    fn stage(&self) -> WorkflowStage {
        WorkflowStage::Verifying
    }

    async fn execute(&self, ctx: StageContext) -> StageResult {
        let citations = ctx.latest_citations().unwrap_or(&[]);

        // Every accepted citation must still resolve at this revision
        let mut misses = Vec::new();
        for citation in citations {
            if self.snapshot.line(&citation.path, citation.line).is_none() {
                misses.push(format!("{}:{}", citation.path, citation.line));
            }
        }
        if !misses.is_empty() {
            return ctx.fail(StageError::structural(format!(
                "citations no longer resolve: {}",
                misses.join(", ")
            )));
        }

        // Execution checks for fenced code blocks, if a sandbox exists
        if let (Some(sandbox), Some(draft)) = (&self.sandbox, ctx.latest_draft()) {
            for block in fenced_code_blocks(&draft.body) {
                match sandbox.run(&block) {
                    Ok(outcome) if outcome.exit_code == 0 => {}
                    Ok(outcome) => {
                        return ctx.fail(StageError::structural(format!(
                            "example exited with code {}: {}",
                            outcome.exit_code, outcome.stderr
                        )));
                    }
                    Err(e) => {
                        return ctx.fail(StageError::transient(format!("sandbox error: {}", e)));
                    }
                }
            }
        }

        debug!(citations = citations.len(), "verification passed");
        ctx.ok(vec![])
    }
}

/// Extract the contents of ``` fenced blocks from markdown.
fn fenced_code_blocks(body: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<String> = None;

    for line in body.lines() {
        if line.trim_start().starts_with("```") {
            match current.take() {
                Some(block) => blocks.push(block),
                None => current = Some(String::new()),
            }
        } else if let Some(block) = current.as_mut() {
            block.push_str(line);
            block.push('\n');
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ClaimSpec, SubjectSpec};
    use scrivener_domain::traits::ExecOutcome;
    use scrivener_domain::{HallMetric, RunId, SkillDraft, SymbolLocation};
    use scrivener_pipeline::CancelFlag;

    fn ctx(stage: WorkflowStage, history: Vec<StageResult>) -> StageContext {
        StageContext::new(
            RunId::new(),
            "skill-1",
            stage,
            1,
            0,
            CancelFlag::new(),
            Arc::new(HallMetric::new()),
            history,
        )
    }

    fn sample_draft() -> DraftFile {
        DraftFile {
            skill_id: "skill-1".to_string(),
            title: "Parsing".to_string(),
            body: "Uses `parse`.".to_string(),
            claims: vec![ClaimSpec {
                statement: "`parse` is defined".to_string(),
                subject: SubjectSpec::Symbol {
                    name: "parse".to_string(),
                    path: "lib.rs".to_string(),
                },
            }],
        }
    }

    #[tokio::test]
    async fn test_mining_empty_snapshot_fails() {
        let stage = MiningStage::new(Arc::new(RepoSnapshot::new("rev1")));
        let result = stage.execute(ctx(WorkflowStage::Mining, vec![])).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn test_linking_finds_candidates() {
        let snapshot =
            Arc::new(RepoSnapshot::new("rev1").with_file("lib.rs", "pub fn parse() {}\n"));
        let stage = LinkingStage::new(snapshot, sample_draft());

        let result = stage.execute(ctx(WorkflowStage::Linking, vec![])).await;

        assert!(result.success);
        match &result.artifacts[0] {
            Artifact::SymbolMap(links) => {
                assert_eq!(links.len(), 1);
                assert_eq!(links[0].candidates.len(), 1);
                assert_eq!(links[0].candidates[0].line, 1);
            }
            other => panic!("Expected SymbolMap, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_writing_attaches_candidates() {
        let snapshot =
            Arc::new(RepoSnapshot::new("rev1").with_file("lib.rs", "pub fn parse() {}\n"));
        let linker = LinkingStage::new(snapshot, sample_draft());
        let link_result = linker.execute(ctx(WorkflowStage::Linking, vec![])).await;

        let writer = WritingStage::new(sample_draft());
        let result = writer
            .execute(ctx(WorkflowStage::Writing, vec![link_result]))
            .await;

        assert!(result.success);
        match &result.artifacts[0] {
            Artifact::Draft(skill) => {
                assert_eq!(skill.claims[0].candidates.len(), 1);
            }
            other => panic!("Expected Draft, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_verify_rejects_stale_citations() {
        let snapshot = Arc::new(RepoSnapshot::new("rev1").with_file("lib.rs", "one line\n"));
        let stage = VerifyStage::new(snapshot.clone());

        let citation = SourceRef::new(
            "lib.rs",
            SymbolLocation { line: 99, column: 1 },
            "rev1",
            scrivener_domain::EvidenceMethod::TextualSearch,
        );
        let history = vec![StageResult::ok(
            WorkflowStage::Auditing,
            1,
            vec![Artifact::Citations(vec![citation])],
        )];

        let result = stage.execute(ctx(WorkflowStage::Verifying, history)).await;
        assert!(!result.success);
        assert!(result.error.unwrap().message.contains("no longer resolve"));
    }

    #[tokio::test]
    async fn test_verify_runs_fenced_blocks_through_sandbox() {
        struct FailingSandbox;

        impl SandboxRunner for FailingSandbox {
            type Error = std::convert::Infallible;

            fn run(&self, _code: &str) -> Result<ExecOutcome, Self::Error> {
                Ok(ExecOutcome {
                    exit_code: 2,
                    stdout: String::new(),
                    stderr: "boom".to_string(),
                })
            }
        }

        let snapshot = Arc::new(RepoSnapshot::new("rev1").with_file("lib.rs", "x\n"));
        let stage = VerifyStage::with_sandbox(snapshot, FailingSandbox);

        let draft = SkillDraft::new(
            "skill-1",
            "T",
            "Example:\n```\nprint('hi')\n```\n",
            vec![],
        );
        let history = vec![StageResult::ok(
            WorkflowStage::Writing,
            1,
            vec![Artifact::Draft(draft)],
        )];

        let result = stage.execute(ctx(WorkflowStage::Verifying, history)).await;
        assert!(!result.success);
        assert!(result.error.unwrap().message.contains("exited with code 2"));
    }

    #[test]
    fn test_fenced_code_blocks() {
        let body = "intro\n```\nline1\nline2\n```\nmiddle\n```python\nline3\n```\n";
        let blocks = fenced_code_blocks(body);
        assert_eq!(blocks, vec!["line1\nline2\n", "line3\n"]);
    }
}
