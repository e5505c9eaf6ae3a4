//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the core and its
//! collaborators. Implementations live in other crates or outside the
//! workspace entirely.

/// One file as seen by the repository snapshot provider
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// Whether the file exists at this revision
    pub exists: bool,

    /// File content; empty when the file does not exist
    pub content: String,

    /// Revision the snapshot was taken at
    pub revision_id: String,
}

/// Read-only access to a repository snapshot
///
/// The snapshot must not change for the duration of a run; adapters rely
/// on every read observing the same revision.
pub trait SnapshotProvider {
    /// Error type for snapshot operations
    type Error;

    /// Read one file from the snapshot
    fn read(&self, path: &str) -> Result<FileRecord, Self::Error>;

    /// List every path in the snapshot
    fn paths(&self) -> Result<Vec<String>, Self::Error>;

    /// The revision this snapshot was taken at
    fn revision_id(&self) -> &str;
}

/// Output of a sandboxed execution
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    /// Process exit code
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

/// Sandboxed code execution, consulted for "runs correctly" claims
pub trait SandboxRunner {
    /// Error type for sandbox operations
    type Error;

    /// Run a code snippet and capture its outcome
    fn run(&self, code: &str) -> Result<ExecOutcome, Self::Error>;
}

/// Durable persistence for accepted skills
///
/// The sink is an external collaborator: the core only guarantees that a
/// retried commit with the same idempotency key yields the same record
/// id, which the ledger in front of the sink enforces.
pub trait PersistenceSink {
    /// Error type for sink operations
    type Error;

    /// Commit a rendered skill with its citations; returns the record id
    fn commit(
        &mut self,
        skill_id: &str,
        body: &str,
        citations: &[crate::citation::SourceRef],
    ) -> Result<String, Self::Error>;
}
