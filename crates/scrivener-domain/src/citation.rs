//! Citations pinning claims to exact source locations

use crate::method::EvidenceMethod;

/// An exact position in a snapshot file, as reported by an evidence backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolLocation {
    /// 1-based line number
    pub line: u32,
    /// 1-based column number
    pub column: u32,
}

/// A citation pinning a claim to a file location, revision, and the
/// detection method that produced it
///
/// A SourceRef is produced by exactly one evidence method adapter and is
/// never mutated afterwards. Its trust level always comes from the
/// calibration table, so two refs from the same method carry the same
/// trust regardless of which claim they cite.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    /// File path relative to the snapshot root
    pub path: String,

    /// 1-based line number
    pub line: u32,

    /// 1-based column number
    pub column: u32,

    /// Revision the snapshot was taken at
    pub revision_id: String,

    /// Method that located this reference
    pub method: EvidenceMethod,

    /// Calibrated trust level of the method
    pub trust_level: f64,
}

impl SourceRef {
    /// Build a citation from a method and a located position
    ///
    /// The trust level is taken from the calibration table, never passed
    /// in by the caller.
    pub fn new(
        path: impl Into<String>,
        location: SymbolLocation,
        revision_id: impl Into<String>,
        method: EvidenceMethod,
    ) -> Self {
        Self {
            path: path.into(),
            line: location.line,
            column: location.column,
            revision_id: revision_id.into(),
            method,
            trust_level: method.trust_level(),
        }
    }
}
