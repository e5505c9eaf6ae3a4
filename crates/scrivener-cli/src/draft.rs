//! Draft skill files - the on-disk stand-in for generation agents.
//!
//! The real pipeline receives drafts from external Writer agents; the
//! CLI reads an equivalent JSON file so every core path (linking, audit,
//! gate, verify, store) runs unchanged.

use crate::error::{CliError, Result};
use scrivener_domain::{Claim, ClaimSubject, SkillDraft};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A draft skill as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftFile {
    /// Stable skill identifier
    pub skill_id: String,

    /// Skill title
    pub title: String,

    /// Markdown body
    pub body: String,

    /// Claims the body makes
    #[serde(default)]
    pub claims: Vec<ClaimSpec>,
}

/// One claim in a draft file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSpec {
    /// The assertion text
    pub statement: String,

    /// What the claim is about
    pub subject: SubjectSpec,
}

/// Subject variants as they appear in draft files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubjectSpec {
    /// A named symbol in a file
    Symbol {
        /// Symbol name
        name: String,
        /// File path
        path: String,
    },

    /// A line range in a file
    FileRegion {
        /// File path
        path: String,
        /// First line (1-based)
        start_line: u32,
        /// Last line (1-based, inclusive)
        end_line: u32,
    },

    /// A behavioral assertion
    Behavior {
        /// Behavior description
        description: String,
        /// File path
        path: String,
    },
}

impl DraftFile {
    /// Load and parse a draft file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Draft(format!("cannot read {}: {}", path.display(), e)))?;
        let draft: DraftFile = serde_json::from_str(&contents)
            .map_err(|e| CliError::Draft(format!("cannot parse {}: {}", path.display(), e)))?;

        if draft.skill_id.is_empty() {
            return Err(CliError::Draft("skill_id is empty".to_string()));
        }
        Ok(draft)
    }

    /// Convert to the domain draft, minting claim ids.
    pub fn to_skill_draft(&self) -> SkillDraft {
        let claims = self
            .claims
            .iter()
            .map(|spec| Claim::new(spec.subject.clone().into(), spec.statement.clone()))
            .collect();
        SkillDraft::new(&self.skill_id, &self.title, &self.body, claims)
    }
}

impl From<SubjectSpec> for ClaimSubject {
    fn from(spec: SubjectSpec) -> Self {
        match spec {
            SubjectSpec::Symbol { name, path } => ClaimSubject::Symbol { name, path },
            SubjectSpec::FileRegion {
                path,
                start_line,
                end_line,
            } => ClaimSubject::FileRegion {
                path,
                start_line,
                end_line,
            },
            SubjectSpec::Behavior { description, path } => {
                ClaimSubject::Behavior { description, path }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "skill_id": "parsing-guide",
        "title": "Parsing",
        "body": "The parser entry point is `parse`.",
        "claims": [
            {
                "statement": "`parse` is defined in src/parser.rs",
                "subject": {"type": "symbol", "name": "parse", "path": "src/parser.rs"}
            },
            {
                "statement": "lines 1-20 implement tokenization",
                "subject": {"type": "file-region", "path": "src/lexer.rs", "start_line": 1, "end_line": 20}
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let draft: DraftFile = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(draft.skill_id, "parsing-guide");
        assert_eq!(draft.claims.len(), 2);
    }

    #[test]
    fn test_to_skill_draft() {
        let draft: DraftFile = serde_json::from_str(SAMPLE).unwrap();
        let skill = draft.to_skill_draft();

        assert_eq!(skill.claims.len(), 2);
        assert_eq!(skill.claims[0].subject.token(), Some("parse"));
        match &skill.claims[1].subject {
            ClaimSubject::FileRegion { end_line, .. } => assert_eq!(*end_line, 20),
            other => panic!("Expected FileRegion, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_empty_skill_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, r#"{"skill_id": "", "title": "t", "body": "b"}"#).unwrap();

        assert!(DraftFile::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(DraftFile::load(Path::new("/nonexistent/draft.json")).is_err());
    }
}
