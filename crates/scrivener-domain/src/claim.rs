//! Claim module - the atomic assertion a generation stage produces

use crate::citation::SourceRef;
use std::fmt;

/// Unique identifier for a claim based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability, so claim order within a run is recoverable
/// - 128-bit uniqueness without coordination across concurrent runs
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClaimId(u128);

impl ClaimId {
    /// Generate a new UUIDv7-based ClaimId
    ///
    /// # Examples
    ///
    /// ```
    /// use scrivener_domain::ClaimId;
    ///
    /// let id = ClaimId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ClaimId from a raw u128 value
    ///
    /// This is primarily for collaborators that round-trip ids through
    /// their own storage.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ClaimId from a UUIDv7 string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for ClaimId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// What a claim is about
///
/// Evidence adapters resolve the subject against the repository snapshot;
/// the variant determines which adapters can say anything useful about it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClaimSubject {
    /// A named symbol (function, type, constant) expected to exist
    Symbol {
        /// Symbol name as it appears in source
        name: String,
        /// File the symbol is claimed to live in
        path: String,
    },

    /// A region of a file, e.g. "lines 10-24 implement the retry loop"
    FileRegion {
        /// File path relative to the snapshot root
        path: String,
        /// First line of the region (1-based)
        start_line: u32,
        /// Last line of the region (1-based, inclusive)
        end_line: u32,
    },

    /// A behavioral assertion, e.g. "returns an error on empty input"
    Behavior {
        /// Free-form description of the behavior
        description: String,
        /// File the behavior is attributed to
        path: String,
    },
}

impl ClaimSubject {
    /// The file path this subject is anchored to
    pub fn path(&self) -> &str {
        match self {
            ClaimSubject::Symbol { path, .. } => path,
            ClaimSubject::FileRegion { path, .. } => path,
            ClaimSubject::Behavior { path, .. } => path,
        }
    }

    /// The token adapters search for, if the subject names one
    pub fn token(&self) -> Option<&str> {
        match self {
            ClaimSubject::Symbol { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A claim - an atomic assertion produced by a generation stage
///
/// Claims are immutable once produced and owned by the run that created
/// them. The candidate citations come from the stage that wrote the
/// claim; the audit replaces them with evidence-backed ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Subject of the claim
    pub subject: ClaimSubject,

    /// The assertion text as it will appear in the generated skill
    pub statement: String,

    /// Candidate citations proposed by the producing stage
    pub candidates: Vec<SourceRef>,
}

impl Claim {
    /// Create a new claim with a fresh id
    pub fn new(subject: ClaimSubject, statement: impl Into<String>) -> Self {
        Self {
            id: ClaimId::new(),
            subject,
            statement: statement.into(),
            candidates: Vec::new(),
        }
    }

    /// Attach candidate citations
    pub fn with_candidates(mut self, candidates: Vec<SourceRef>) -> Self {
        self.candidates = candidates;
        self
    }
}
