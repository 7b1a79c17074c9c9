//! Description analyzer - classifies one test description
//!
//! Checks run in a fixed priority order and the first one that matches
//! decides the result. A fix always replaces the whole literal, quotes
//! included, and reuses the original delimiter. Some fixes (vague start,
//! duplicated `it`, leading `not`) produce text that needs another pass; see
//! [`crate::analyzer::fixpoint`].

use crate::lexicon::{messages, Lexicon};
use crate::{Span, ViolationKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::OnceLock;

/// Descriptions longer than this (in characters) are reported as too long
pub const MAX_DESCRIPTION_LENGTH: usize = 100;

/// Quote characters a description literal may use
pub const DELIMITERS: [char; 3] = ['"', '\'', '`'];

/// Error building a [`Description`] from raw literal text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptionError {
    #[error("literal {0:?} is too short to be quoted")]
    TooShort(String),
    #[error("unrecognized string delimiter {0:?}")]
    UnknownDelimiter(char),
    #[error("literal opens with {open:?} but closes with {close:?}")]
    MismatchedDelimiters { open: char, close: char },
}

/// The text of a description literal and where it sits in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// Text between the quotes
    pub text: String,
    /// Quote character used by the literal
    pub delimiter: char,
    /// Byte offset of the opening quote
    pub start: usize,
    /// Byte offset just past the closing quote
    pub end: usize,
}

impl Description {
    pub fn new(text: impl Into<String>, delimiter: char, start: usize) -> Self {
        let text = text.into();
        let end = start + text.len() + 2 * delimiter.len_utf8();
        Self {
            text,
            delimiter,
            start,
            end,
        }
    }

    /// Build from the raw literal token (`'does something'`) starting at `start`
    pub fn from_literal(raw: &str, start: usize) -> Result<Self, DescriptionError> {
        let mut chars = raw.chars();
        let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
            return Err(DescriptionError::TooShort(raw.to_string()));
        };
        if !DELIMITERS.contains(&open) {
            return Err(DescriptionError::UnknownDelimiter(open));
        }
        if open != close {
            return Err(DescriptionError::MismatchedDelimiters { open, close });
        }
        Ok(Self {
            text: chars.as_str().to_string(),
            delimiter: open,
            start,
            end: start + raw.len(),
        })
    }

    /// Same literal position and delimiter, different text
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self::new(text, self.delimiter, self.start)
    }

    /// The whole literal, quotes included
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Wrap text in this literal's delimiter
    pub fn quote(&self, text: &str) -> String {
        format!("{}{}{}", self.delimiter, text, self.delimiter)
    }

    /// The literal as it appears in source
    pub fn literal(&self) -> String {
        self.quote(&self.text)
    }

    fn text_offset(&self) -> usize {
        self.start + self.delimiter.len_utf8()
    }
}

/// Opt-in checks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionOptions {
    /// Reject descriptions opening with should/could/may/might
    pub no_vague_verbs: bool,
    /// Rewrite a trailing `if` clause to `when`
    pub prefer_when_to_if: bool,
}

/// Proposed rewrite of a description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// New description text (no quotes)
    pub text: String,
    /// Full replacement literal, quotes included
    pub literal: String,
}

/// A broken convention, with where to report it and how to repair it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: &'static str,
    /// Reported range; the first word, the `if` token or the whole literal
    pub span: Span,
    pub fix: Option<Replacement>,
}

/// Outcome of analyzing one description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Valid,
    Violation(Violation),
}

impl Analysis {
    pub fn is_valid(&self) -> bool {
        matches!(self, Analysis::Valid)
    }

    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Analysis::Valid => None,
            Analysis::Violation(v) => Some(v),
        }
    }

    pub fn kind(&self) -> Option<ViolationKind> {
        self.violation().map(|v| v.kind)
    }

    /// Full replacement literal, when the violation is fixable
    pub fn fixed_literal(&self) -> Option<&str> {
        self.violation()
            .and_then(|v| v.fix.as_ref())
            .map(|f| f.literal.as_str())
    }
}

/// A matched check: the kind, the token range within the text and the fixed text
struct Finding {
    kind: ViolationKind,
    token: Range<usize>,
    fixed: Option<String>,
}

impl Finding {
    fn new(kind: ViolationKind, token: Range<usize>, fixed: Option<String>) -> Self {
        Self { kind, token, fixed }
    }
}

/// The description split on its first spaces
struct Words<'a> {
    text: &'a str,
    first: &'a str,
    second: Option<&'a str>,
}

impl<'a> Words<'a> {
    fn split(text: &'a str) -> Self {
        let mut parts = text.split(' ');
        let first = parts.next().unwrap_or("");
        Self {
            text,
            first,
            second: parts.next(),
        }
    }

    fn first_range(&self) -> Range<usize> {
        0..self.first.len()
    }

    /// Text after the first word
    fn rest(&self) -> &'a str {
        &self.text[self.first.len()..]
    }
}

type Check = fn(&Words<'_>, &DescriptionOptions, &Lexicon) -> Option<Finding>;

/// Word-level checks in priority order
const CHECKS: [Check; 8] = [
    capitalized_start,
    unconjugated_regular_verb,
    unconjugated_irregular_verb,
    vague_start,
    conditional_start,
    duplicated_it,
    negated_start,
    if_clause,
];

/// Classify a description and propose a fix for it
pub fn analyze(
    description: &Description,
    options: &DescriptionOptions,
    lexicon: &Lexicon,
) -> Analysis {
    let text = description.text.as_str();

    if text.is_empty() {
        return Analysis::Violation(whole_literal(description, ViolationKind::RequiredDescription));
    }
    if text.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Analysis::Violation(whole_literal(description, ViolationKind::TooLong));
    }

    let words = Words::split(text);
    let Some(finding) = CHECKS
        .iter()
        .find_map(|check| check(&words, options, lexicon))
    else {
        return Analysis::Valid;
    };

    let offset = description.text_offset();
    Analysis::Violation(Violation {
        kind: finding.kind,
        message: messages::message(finding.kind),
        span: Span::new(offset + finding.token.start, offset + finding.token.end),
        fix: finding.fixed.map(|text| Replacement {
            literal: description.quote(&text),
            text,
        }),
    })
}

fn whole_literal(description: &Description, kind: ViolationKind) -> Violation {
    Violation {
        kind,
        message: messages::message(kind),
        span: description.span(),
        fix: None,
    }
}

fn capitalized_start(words: &Words<'_>, _: &DescriptionOptions, _: &Lexicon) -> Option<Finding> {
    let first = words.first.chars().next()?;
    if !first.is_ascii_uppercase() {
        return None;
    }
    let fixed = format!("{}{}", first.to_ascii_lowercase(), &words.text[first.len_utf8()..]);
    Some(Finding::new(
        ViolationKind::NoCapitalization,
        words.first_range(),
        Some(fixed),
    ))
}

fn unconjugated_regular_verb(
    words: &Words<'_>,
    _: &DescriptionOptions,
    lexicon: &Lexicon,
) -> Option<Finding> {
    if !lexicon.is_regular_verb(words.first) {
        return None;
    }
    let fixed = format!("{}s{}", words.first, words.rest());
    Some(Finding::new(
        ViolationKind::WrongGrammarAddS,
        words.first_range(),
        Some(fixed),
    ))
}

fn unconjugated_irregular_verb(
    words: &Words<'_>,
    _: &DescriptionOptions,
    lexicon: &Lexicon,
) -> Option<Finding> {
    let conjugated = lexicon.third_person(words.first)?;
    let fixed = format!("{}{}", conjugated, words.rest());
    Some(Finding::new(
        ViolationKind::WrongGrammar,
        words.first_range(),
        Some(fixed),
    ))
}

fn vague_start(
    words: &Words<'_>,
    options: &DescriptionOptions,
    lexicon: &Lexicon,
) -> Option<Finding> {
    if !options.no_vague_verbs || !lexicon.is_vague_verb(words.first) {
        return None;
    }
    Some(Finding::new(
        ViolationKind::VagueStart,
        words.first_range(),
        Some(words.rest().trim().to_string()),
    ))
}

/// "when ..." / "if ..." describe a context, not an assertion; no mechanical fix
fn conditional_start(words: &Words<'_>, _: &DescriptionOptions, _: &Lexicon) -> Option<Finding> {
    if words.first != "when" && words.first != "if" {
        return None;
    }
    Some(Finding::new(
        ViolationKind::InvalidStartOfDescription,
        words.first_range(),
        None,
    ))
}

fn duplicated_it(words: &Words<'_>, _: &DescriptionOptions, _: &Lexicon) -> Option<Finding> {
    if words.first != "it" {
        return None;
    }
    Some(Finding::new(
        ViolationKind::DuplicatedIt,
        words.first_range(),
        Some(words.rest().trim().to_string()),
    ))
}

/// "not create" -> "does not create", "not be called" -> "is not called"
fn negated_start(words: &Words<'_>, _: &DescriptionOptions, _: &Lexicon) -> Option<Finding> {
    if words.first != "not" {
        return None;
    }
    let fixed = if words.second == Some("be") {
        format!("is not{}", words.text.replacen("not be", "", 1))
    } else {
        format!("does {}", words.text)
    };
    Some(Finding::new(
        ViolationKind::InvalidStartOfDescription,
        words.first_range(),
        Some(fixed),
    ))
}

fn if_clause_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(.+ )if( .+)").expect("if-clause pattern is valid"))
}

/// "<assertion> if <context>" -> "<assertion> when <context>"
fn if_clause(words: &Words<'_>, options: &DescriptionOptions, _: &Lexicon) -> Option<Finding> {
    if !options.prefer_when_to_if {
        return None;
    }
    let captures = if_clause_pattern().captures(words.text)?;
    let if_start = captures.get(1)?.end();
    let if_end = if_start + "if".len();
    let fixed = format!(
        "{}when{}",
        &words.text[..if_start],
        &words.text[if_end..]
    );
    Some(Finding::new(
        ViolationKind::UseOfIfInsteadOfWhen,
        if_start..if_end,
        Some(fixed),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str) -> Analysis {
        check_with(text, DescriptionOptions::default())
    }

    fn check_with(text: &str, options: DescriptionOptions) -> Analysis {
        let description = Description::new(text, '"', 3);
        analyze(&description, &options, &Lexicon::new())
    }

    fn fixed(text: &str) -> Option<String> {
        check(text).fixed_literal().map(str::to_string)
    }

    const NO_VAGUE: DescriptionOptions = DescriptionOptions {
        no_vague_verbs: true,
        prefer_when_to_if: false,
    };

    const PREFER_WHEN: DescriptionOptions = DescriptionOptions {
        no_vague_verbs: false,
        prefer_when_to_if: true,
    };

    #[test]
    fn conjugated_descriptions_are_valid() {
        assert!(check("does nothing").is_valid());
        assert!(check("returns nothing").is_valid());
        assert!(check("should do nothing").is_valid());
    }

    #[test]
    fn empty_description_is_required() {
        let analysis = check("");
        let violation = analysis.violation().unwrap();
        assert_eq!(violation.kind, ViolationKind::RequiredDescription);
        assert_eq!(violation.span, Span::new(3, 5));
        assert!(violation.fix.is_none());
    }

    #[test]
    fn long_description_is_reported_without_fix() {
        let text = "returns ".repeat(13);
        assert!(text.chars().count() > MAX_DESCRIPTION_LENGTH);
        let analysis = check(&text);
        assert_eq!(analysis.kind(), Some(ViolationKind::TooLong));
        assert_eq!(analysis.violation().unwrap().span, Span::new(3, 3 + text.len() + 2));
        assert!(analysis.fixed_literal().is_none());
    }

    #[test]
    fn length_limit_is_inclusive() {
        let text = "a".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(check(&text).is_valid());
    }

    #[test]
    fn capital_start_is_lowercased() {
        assert_eq!(
            check("Does something").kind(),
            Some(ViolationKind::NoCapitalization)
        );
        assert_eq!(fixed("Does something").as_deref(), Some("\"does something\""));
        assert_eq!(fixed("Returns A Value").as_deref(), Some("\"returns A Value\""));
    }

    #[test]
    fn capital_check_runs_before_keywords() {
        assert_eq!(check("If nothing").kind(), Some(ViolationKind::NoCapitalization));
        assert_eq!(check("Make bread").kind(), Some(ViolationKind::NoCapitalization));
    }

    #[test]
    fn regular_verb_gets_an_s() {
        let analysis = check("make bread");
        assert_eq!(analysis.kind(), Some(ViolationKind::WrongGrammarAddS));
        assert_eq!(analysis.fixed_literal(), Some("\"makes bread\""));
        assert_eq!(fixed("render").as_deref(), Some("\"renders\""));
    }

    #[test]
    fn irregular_verb_is_looked_up() {
        let analysis = check("do something");
        assert_eq!(analysis.kind(), Some(ViolationKind::WrongGrammar));
        assert_eq!(analysis.fixed_literal(), Some("\"does something\""));
        assert_eq!(
            fixed("don't do anything").as_deref(),
            Some("\"doesn't do anything\"")
        );
        assert_eq!(fixed("apply the theme").as_deref(), Some("\"applies the theme\""));
    }

    #[test]
    fn vague_start_only_when_enabled() {
        assert!(check("should do something").is_valid());

        let analysis = check_with("should do something", NO_VAGUE);
        assert_eq!(analysis.kind(), Some(ViolationKind::VagueStart));
        assert_eq!(analysis.fixed_literal(), Some("\"do something\""));
    }

    #[test]
    fn when_and_if_starts_have_no_fix() {
        for text in ["when clicked", "if empty"] {
            let analysis = check(text);
            assert_eq!(analysis.kind(), Some(ViolationKind::InvalidStartOfDescription));
            assert!(analysis.fixed_literal().is_none());
        }
        assert!(check("whenever").is_valid());
    }

    #[test]
    fn duplicated_it_is_stripped() {
        let analysis = check("it does something");
        assert_eq!(analysis.kind(), Some(ViolationKind::DuplicatedIt));
        assert_eq!(analysis.fixed_literal(), Some("\"does something\""));
    }

    #[test]
    fn leading_not_gets_an_auxiliary() {
        let analysis = check("not return anything");
        assert_eq!(analysis.kind(), Some(ViolationKind::InvalidStartOfDescription));
        assert_eq!(analysis.fixed_literal(), Some("\"does not return anything\""));

        assert_eq!(fixed("not be called").as_deref(), Some("\"is not called\""));
    }

    #[test]
    fn if_clause_becomes_when() {
        let text = "does something if you look at it";
        let analysis = check_with(text, PREFER_WHEN);
        let violation = analysis.violation().unwrap();
        assert_eq!(violation.kind, ViolationKind::UseOfIfInsteadOfWhen);
        assert_eq!(
            analysis.fixed_literal(),
            Some("\"does something when you look at it\"")
        );
        let if_at = 3 + 1 + text.find(" if ").unwrap() + 1;
        assert_eq!(violation.span, Span::new(if_at, if_at + 2));

        assert!(check(text).is_valid());
    }

    #[test]
    fn if_clause_needs_context_after_it() {
        assert!(check_with("does something if", PREFER_WHEN).is_valid());
        assert!(check_with("does something iffy here", PREFER_WHEN).is_valid());
    }

    #[test]
    fn first_word_span_skips_the_quote() {
        let violation = check("make bread").violation().cloned().unwrap();
        assert_eq!(violation.span, Span::new(4, 8));
    }

    #[test]
    fn fix_reuses_delimiter() {
        let description = Description::new("make bread", '\'', 0);
        let analysis = analyze(&description, &DescriptionOptions::default(), &Lexicon::new());
        assert_eq!(analysis.fixed_literal(), Some("'makes bread'"));
    }

    #[test]
    fn extended_lexicon_is_consulted() {
        let lexicon = Lexicon::new().with_regular_verbs(["emit"]);
        let description = Description::new("emit an event", '"', 0);
        let analysis = analyze(&description, &DescriptionOptions::default(), &lexicon);
        assert_eq!(analysis.fixed_literal(), Some("\"emits an event\""));
    }

    #[test]
    fn from_literal_strips_quotes() {
        let description = Description::from_literal("'does it'", 10).unwrap();
        assert_eq!(description.text, "does it");
        assert_eq!(description.delimiter, '\'');
        assert_eq!(description.span(), Span::new(10, 19));
        assert_eq!(description.literal(), "'does it'");
    }

    #[test]
    fn from_literal_rejects_bad_quotes() {
        assert_eq!(
            Description::from_literal("\"", 0),
            Err(DescriptionError::TooShort("\"".to_string()))
        );
        assert_eq!(
            Description::from_literal("abc", 0),
            Err(DescriptionError::UnknownDelimiter('a'))
        );
        assert_eq!(
            Description::from_literal("'abc\"", 0),
            Err(DescriptionError::MismatchedDelimiters {
                open: '\'',
                close: '"'
            })
        );
    }
}
