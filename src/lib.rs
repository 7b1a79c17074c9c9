//! Tenor: Test Description Grammar Linter
//!
//! This library checks the description strings passed to `it(...)` in
//! TypeScript/JavaScript test files and proposes rewrites that bring them to a
//! consistent style: a conjugated verb first ("returns", not "return"), a
//! lower-case start, no vague modal openers, bounded length and `when` for the
//! context clause.

pub mod analyzer;
pub mod config;
pub mod fixer;
pub mod lexicon;
pub mod parser;
pub mod reporter;

pub use analyzer::description::{
    analyze, Analysis, Description, DescriptionError, DescriptionOptions, Replacement, Violation,
    MAX_DESCRIPTION_LENGTH,
};
pub use analyzer::fixpoint::{fix_to_fixpoint, fix_to_fixpoint_with, FixOutcome, MAX_FIX_PASSES};
pub use lexicon::Lexicon;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of linting one test file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    /// Path to the linted test file
    pub file_path: PathBuf,
    /// Number of literal descriptions that were analyzed
    pub descriptions_checked: usize,
    /// Violations found, in source order
    pub issues: Vec<Issue>,
}

impl FileReport {
    /// Number of issues with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// Number of issues that carry an autofix
    pub fn fixable(&self) -> usize {
        self.issues.iter().filter(|i| i.fix.is_some()).count()
    }
}

/// A description that breaks the naming convention
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Which convention is broken
    pub kind: ViolationKind,
    /// Severity of the issue
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// The test description (without quotes)
    pub description: String,
    /// Location of the reported span in the file
    pub location: Location,
    /// Reported span as byte offsets into the file
    pub span: Span,
    /// Auto-fix for the whole literal (when the kind is fixable)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

/// Replacement of a whole description literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    /// Byte range of the literal (quotes included)
    pub range: Span,
    /// Literal produced by a single fix step
    pub replacement: String,
    /// Literal after re-analyzing until nothing more can be fixed
    pub final_replacement: String,
    /// Number of fix steps needed to reach `final_replacement`
    pub passes: usize,
}

/// Half-open byte range `[start, end)` in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Severity levels for issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// The closed set of description conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// Empty description
    RequiredDescription,
    /// Longer than the maximum description length
    TooLong,
    /// Starts with an upper-case letter
    NoCapitalization,
    /// Irregular verb in base form ("do" instead of "does")
    WrongGrammar,
    /// Regular verb in base form ("return" instead of "returns")
    WrongGrammarAddS,
    /// Starts with should/could/may/might
    VagueStart,
    /// Starts with a word that cannot open an assertion (when, if, not)
    InvalidStartOfDescription,
    /// Starts with "it", repeating the test function name
    DuplicatedIt,
    /// Umbrella kind kept for configs written against older releases
    GenericError,
    /// Context clause introduced with "if" instead of "when"
    UseOfIfInsteadOfWhen,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 10] = [
        ViolationKind::RequiredDescription,
        ViolationKind::TooLong,
        ViolationKind::NoCapitalization,
        ViolationKind::WrongGrammar,
        ViolationKind::WrongGrammarAddS,
        ViolationKind::VagueStart,
        ViolationKind::InvalidStartOfDescription,
        ViolationKind::DuplicatedIt,
        ViolationKind::GenericError,
        ViolationKind::UseOfIfInsteadOfWhen,
    ];

    /// Look up a kind by its kebab-case id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.to_string() == id)
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::RequiredDescription => write!(f, "required-description"),
            ViolationKind::TooLong => write!(f, "too-long"),
            ViolationKind::NoCapitalization => write!(f, "no-capitalization"),
            ViolationKind::WrongGrammar => write!(f, "wrong-grammar"),
            ViolationKind::WrongGrammarAddS => write!(f, "wrong-grammar-add-s"),
            ViolationKind::VagueStart => write!(f, "vague-start"),
            ViolationKind::InvalidStartOfDescription => write!(f, "invalid-start-of-description"),
            ViolationKind::DuplicatedIt => write!(f, "duplicated-it"),
            ViolationKind::GenericError => write!(f, "generic-error"),
            ViolationKind::UseOfIfInsteadOfWhen => write!(f, "use-of-if-instead-of-when"),
        }
    }
}

/// Location in a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    /// End line (optional)
    pub end_line: Option<usize>,
    /// End column (optional)
    pub end_column: Option<usize>,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            end_line: None,
            end_column: None,
        }
    }

    pub fn with_end(mut self, end_line: usize, end_column: usize) -> Self {
        self.end_line = Some(end_line);
        self.end_column = Some(end_column);
        self
    }
}

/// Public API: lint a single test file. Used by the LSP server and other programmatic consumers.
///
/// * `path` - path to the test file
/// * `work_dir` - directory where the `.tenorrc.json` search starts
/// * `config_path` - optional explicit config path; if None, searches from work_dir
pub fn lint_file(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<FileReport> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let engine = crate::analyzer::LintEngine::from_config(&config);
    engine.lint(path, Some(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_ids_round_trip_through_from_id() {
        for kind in ViolationKind::ALL {
            assert_eq!(ViolationKind::from_id(&kind.to_string()), Some(kind));
        }
        assert_eq!(ViolationKind::from_id("weak-assertion"), None);
    }

    #[test]
    fn kind_serializes_as_display_id() {
        let json = serde_json::to_string(&ViolationKind::WrongGrammarAddS).unwrap();
        assert_eq!(json, "\"wrong-grammar-add-s\"");
        let json = serde_json::to_string(&ViolationKind::UseOfIfInsteadOfWhen).unwrap();
        assert_eq!(json, "\"use-of-if-instead-of-when\"");
    }

    #[test]
    fn span_len() {
        assert_eq!(Span::new(3, 7).len(), 4);
        assert!(Span::new(5, 5).is_empty());
    }
}
