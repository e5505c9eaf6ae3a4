//! Skill drafts - the documentation artifact flowing through the pipeline

use crate::claim::Claim;

/// A generated documentation skill, pre-audit
///
/// The Writing stage produces a draft; the audit decides whether its
/// claims survive. The draft is immutable once produced: regeneration
/// produces a new draft rather than editing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillDraft {
    /// Stable external identifier, one per skill/library pairing
    pub skill_id: String,

    /// Skill title
    pub title: String,

    /// Markdown body of the skill
    pub body: String,

    /// Claims the body makes about the source
    pub claims: Vec<Claim>,
}

impl SkillDraft {
    /// Create a draft
    pub fn new(
        skill_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        claims: Vec<Claim>,
    ) -> Self {
        Self {
            skill_id: skill_id.into(),
            title: title.into(),
            body: body.into(),
            claims,
        }
    }
}
