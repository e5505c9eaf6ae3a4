//! In-memory persistence sink

use scrivener_domain::traits::PersistenceSink;
use scrivener_domain::SourceRef;
use std::collections::HashMap;
use std::convert::Infallible;

/// A committed skill as the memory sink keeps it
#[derive(Debug, Clone)]
struct StoredSkill {
    skill_id: String,
    body: String,
    citation_count: usize,
}

/// Sink that keeps committed skills in memory
///
/// Stands in for the durable store in tests and local runs; the real
/// sink is an external collaborator behind the same trait.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: HashMap<String, StoredSkill>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The skill id and citation count behind a record id
    pub fn record(&self, record_id: &str) -> Option<(&str, usize)> {
        self.records
            .get(record_id)
            .map(|s| (s.skill_id.as_str(), s.citation_count))
    }

    /// The committed body behind a record id
    pub fn body(&self, record_id: &str) -> Option<&str> {
        self.records.get(record_id).map(|s| s.body.as_str())
    }
}

impl PersistenceSink for MemorySink {
    type Error = Infallible;

    fn commit(
        &mut self,
        skill_id: &str,
        body: &str,
        citations: &[SourceRef],
    ) -> Result<String, Self::Error> {
        let record_id = format!("rec-{}", uuid::Uuid::now_v7());
        self.records.insert(
            record_id.clone(),
            StoredSkill {
                skill_id: skill_id.to_string(),
                body: body.to_string(),
                citation_count: citations.len(),
            },
        );
        Ok(record_id)
    }
}
