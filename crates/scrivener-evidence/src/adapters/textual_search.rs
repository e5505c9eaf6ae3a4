//! Textual-search evidence adapter (trust 0.85)
//!
//! The one method implemented directly in this crate: a word-boundary
//! search over the snapshot file a subject is anchored to. Lowest trust
//! in the calibration table - text can match without the symbol being
//! real - but always available.

use crate::adapter::EvidenceAdapter;
use crate::snapshot::RepoSnapshot;
use async_trait::async_trait;
use scrivener_domain::{ClaimSubject, EvidenceFinding, EvidenceMethod, SymbolLocation};

/// Adapter for the textual-search method
#[derive(Debug, Default)]
pub struct TextualSearchAdapter;

impl TextualSearchAdapter {
    /// Create the adapter; needs no backend
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EvidenceAdapter for TextualSearchAdapter {
    fn method(&self) -> EvidenceMethod {
        EvidenceMethod::TextualSearch
    }

    async fn check(&self, subject: &ClaimSubject, snapshot: &RepoSnapshot) -> EvidenceFinding {
        match subject {
            ClaimSubject::Symbol { name, path } => {
                let Some(content) = snapshot.file(path) else {
                    return EvidenceFinding::no_match(
                        self.method(),
                        format!("{} does not exist at revision {}", path, snapshot.revision()),
                    );
                };

                match find_token(content, name) {
                    Some(location) => EvidenceFinding::matched(
                        self.method(),
                        location,
                        format!("'{}' found at {}:{}", name, path, location.line),
                    ),
                    None => EvidenceFinding::no_match(
                        self.method(),
                        format!("'{}' not found in {}", name, path),
                    ),
                }
            }

            ClaimSubject::FileRegion {
                path,
                start_line,
                end_line,
            } => {
                let Some(content) = snapshot.file(path) else {
                    return EvidenceFinding::no_match(
                        self.method(),
                        format!("{} does not exist at revision {}", path, snapshot.revision()),
                    );
                };

                let line_count = content.lines().count() as u32;
                if *start_line == 0 || start_line > end_line {
                    return EvidenceFinding::no_match(
                        self.method(),
                        format!("invalid region {}..{}", start_line, end_line),
                    );
                }
                if *end_line <= line_count {
                    EvidenceFinding::matched(
                        self.method(),
                        SymbolLocation {
                            line: *start_line,
                            column: 1,
                        },
                        format!("{} spans lines {}..{}", path, start_line, end_line),
                    )
                } else {
                    EvidenceFinding::no_match(
                        self.method(),
                        format!("{} has only {} lines, region ends at {}", path, line_count, end_line),
                    )
                }
            }

            // Free-form behavior cannot be corroborated by grep; that is
            // the sandbox runner's job in the Verify stage.
            ClaimSubject::Behavior { .. } => EvidenceFinding::unavailable(
                self.method(),
                "textual search cannot corroborate behavioral claims",
            ),
        }
    }
}

/// Find the first word-boundary occurrence of `token` in `content`
fn find_token(content: &str, token: &str) -> Option<SymbolLocation> {
    if token.is_empty() {
        return None;
    }

    for (line_idx, line) in content.lines().enumerate() {
        let mut from = 0;
        while let Some(pos) = line[from..].find(token) {
            let start = from + pos;
            let end = start + token.len();

            let before_ok = start == 0
                || !line[..start].chars().next_back().is_some_and(is_word_char);
            let after_ok = end == line.len()
                || !line[end..].chars().next().is_some_and(is_word_char);

            if before_ok && after_ok {
                return Some(SymbolLocation {
                    line: line_idx as u32 + 1,
                    column: start as u32 + 1,
                });
            }
            from = end;
        }
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
