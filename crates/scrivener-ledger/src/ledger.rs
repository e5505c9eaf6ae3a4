//! The idempotency ledger

use crate::error::LedgerError;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// The key a Store submission is deduplicated on
///
/// Same skill and same rendered content hash to the same key, so a
/// retried Store (or a regenerated run that converged on identical
/// output) maps onto the record already committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey {
    /// Stable skill identifier
    pub skill_id: String,

    /// SHA-256 of the rendered skill body, lowercase hex
    pub content_hash: String,
}

impl IdempotencyKey {
    /// Derive the key for a skill's rendered content
    pub fn for_content(skill_id: impl Into<String>, body: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(body.as_bytes());
        let digest = hasher.finalize();
        let content_hash = digest.iter().map(|b| format!("{:02x}", b)).collect();

        Self {
            skill_id: skill_id.into(),
            content_hash,
        }
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.skill_id, &self.content_hash[..12.min(self.content_hash.len())])
    }
}

/// In-process ledger with atomic check-and-insert
///
/// The map is guarded by one mutex held across the commit closure, which
/// is the atomicity the Store stage needs: two concurrent submissions of
/// the same key cannot both reach the sink.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: Mutex<HashMap<IdempotencyKey, String>>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the record id previously committed under a key
    pub fn lookup(&self, key: &IdempotencyKey) -> Result<Option<String>, LedgerError> {
        let entries = self.entries.lock().map_err(|_| LedgerError::Lock)?;
        Ok(entries.get(key).cloned())
    }

    /// Atomic check-and-insert: return the existing record id for the
    /// key, or run `commit` and remember its result
    ///
    /// The boolean is true when the key had already been committed
    /// (deduplicated). A failed commit leaves the ledger unchanged, so a
    /// retry gets a fresh shot.
    pub fn get_or_commit(
        &self,
        key: &IdempotencyKey,
        commit: impl FnOnce() -> Result<String, LedgerError>,
    ) -> Result<(String, bool), LedgerError> {
        let mut entries = self.entries.lock().map_err(|_| LedgerError::Lock)?;

        if let Some(existing) = entries.get(key) {
            debug!(%key, record_id = %existing, "idempotency key already committed");
            return Ok((existing.clone(), true));
        }

        let record_id = commit()?;
        entries.insert(key.clone(), record_id.clone());
        debug!(%key, %record_id, "idempotency key committed");
        Ok((record_id, false))
    }

    /// Number of committed keys
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
