//! Read-only repository snapshots

use crate::error::EvidenceError;
use scrivener_domain::traits::{FileRecord, SnapshotProvider};
use std::collections::BTreeMap;
use std::path::Path;

/// An immutable, in-memory view of a repository at one revision
///
/// Every evidence method in a run reads the same snapshot, so no method
/// can observe a different revision than another (no tearing). The
/// snapshot never changes for the duration of a run.
#[derive(Debug, Clone)]
pub struct RepoSnapshot {
    files: BTreeMap<String, String>,
    revision_id: String,
}

impl RepoSnapshot {
    /// Create an empty snapshot at the given revision
    pub fn new(revision_id: impl Into<String>) -> Self {
        Self {
            files: BTreeMap::new(),
            revision_id: revision_id.into(),
        }
    }

    /// Add a file to the snapshot (builder style, for tests and wiring)
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Materialize a snapshot from a directory tree
    ///
    /// Files that are not valid UTF-8 are skipped; evidence methods only
    /// operate on text.
    pub fn from_dir(root: &Path, revision_id: impl Into<String>) -> Result<Self, EvidenceError> {
        let mut snapshot = Self::new(revision_id);
        collect_files(root, root, &mut snapshot.files)?;
        Ok(snapshot)
    }

    /// Get a file's content, if present
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    /// Get one line of a file (1-based), if present
    pub fn line(&self, path: &str, line: u32) -> Option<&str> {
        if line == 0 {
            return None;
        }
        self.file(path)?.lines().nth(line as usize - 1)
    }

    /// All paths in the snapshot, sorted
    pub fn file_paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Number of files in the snapshot
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the snapshot holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The revision this snapshot was taken at
    pub fn revision(&self) -> &str {
        &self.revision_id
    }
}

impl SnapshotProvider for RepoSnapshot {
    type Error = std::convert::Infallible;

    fn read(&self, path: &str) -> Result<FileRecord, Self::Error> {
        Ok(match self.files.get(path) {
            Some(content) => FileRecord {
                exists: true,
                content: content.clone(),
                revision_id: self.revision_id.clone(),
            },
            None => FileRecord {
                exists: false,
                content: String::new(),
                revision_id: self.revision_id.clone(),
            },
        })
    }

    fn paths(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.file_paths())
    }

    fn revision_id(&self) -> &str {
        &self.revision_id
    }
}

fn collect_files(
    root: &Path,
    dir: &Path,
    files: &mut BTreeMap<String, String>,
) -> Result<(), EvidenceError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            // Hidden directories (.git and friends) are not source
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }
            collect_files(root, &path, files)?;
        } else if file_type.is_file() {
            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let rel = path
                        .strip_prefix(root)
                        .map_err(|e| EvidenceError::Snapshot(e.to_string()))?
                        .to_string_lossy()
                        .replace('\\', "/");
                    files.insert(rel, content);
                }
                // Binary file; evidence methods only read text
                Err(_) => continue,
            }
        }
    }
    Ok(())
}
