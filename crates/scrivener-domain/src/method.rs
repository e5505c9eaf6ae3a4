//! Evidence methods and their trust calibration

/// One independent analysis technique used to corroborate a claim
///
/// The calibration table is fixed: trust levels and the priority order
/// are the same everywhere a method is consulted, both when the
/// aggregator weighs findings and when a SourceRef is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceMethod {
    /// Exact match in the file's syntax tree
    SyntaxTree,

    /// Match by a grammar-based multi-language parser
    GrammarParser,

    /// Resolution through a language-server client
    SymbolResolution,

    /// Plain textual search over file content
    TextualSearch,
}

impl EvidenceMethod {
    /// All methods in calibration order, highest trust first
    pub const ALL: [EvidenceMethod; 4] = [
        EvidenceMethod::SyntaxTree,
        EvidenceMethod::GrammarParser,
        EvidenceMethod::SymbolResolution,
        EvidenceMethod::TextualSearch,
    ];

    /// Calibrated trust level of this method
    pub fn trust_level(&self) -> f64 {
        match self {
            EvidenceMethod::SyntaxTree => 1.00,
            EvidenceMethod::GrammarParser => 0.95,
            EvidenceMethod::SymbolResolution => 0.90,
            EvidenceMethod::TextualSearch => 0.85,
        }
    }

    /// Priority rank for tie-breaking; lower rank wins
    ///
    /// Matches the calibration order, so a tie between equally trusted
    /// findings resolves to the method earlier in the table.
    pub fn priority(&self) -> u8 {
        match self {
            EvidenceMethod::SyntaxTree => 0,
            EvidenceMethod::GrammarParser => 1,
            EvidenceMethod::SymbolResolution => 2,
            EvidenceMethod::TextualSearch => 3,
        }
    }

    /// Get the method name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceMethod::SyntaxTree => "syntax-tree",
            EvidenceMethod::GrammarParser => "grammar-parser",
            EvidenceMethod::SymbolResolution => "symbol-resolution",
            EvidenceMethod::TextualSearch => "textual-search",
        }
    }

    /// Parse a method from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax-tree" => Some(EvidenceMethod::SyntaxTree),
            "grammar-parser" => Some(EvidenceMethod::GrammarParser),
            "symbol-resolution" => Some(EvidenceMethod::SymbolResolution),
            "textual-search" => Some(EvidenceMethod::TextualSearch),
            _ => None,
        }
    }
}

impl std::str::FromStr for EvidenceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid evidence method: {}", s))
    }
}
