//! Lint engine - runs the description analyzer over test files

use crate::config::{Config, RuleSeverity};
use crate::lexicon::{self, messages, Lexicon};
use crate::parser::{
    default_test_functions, DescriptionLiteral, IgnoreDirectives, LineIndex, TestFileParser,
    TypeScriptParser,
};
use crate::{FileReport, Fix, Issue, Severity, ViolationKind};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::Tree;

use super::description::{analyze, Analysis, DescriptionOptions, Violation};
use super::fixpoint::fix_to_fixpoint_with;

/// Main lint engine: parses test files and reports description issues
#[derive(Debug, Clone)]
pub struct LintEngine {
    options: DescriptionOptions,
    lexicon: Lexicon,
    emoji: bool,
    test_functions: Vec<String>,
}

impl LintEngine {
    /// Engine with default options, the built-in lexicon and `it` as test function
    pub fn new() -> Self {
        Self {
            options: DescriptionOptions::default(),
            lexicon: lexicon::builtin().clone(),
            emoji: false,
            test_functions: default_test_functions(),
        }
    }

    /// Engine configured from a loaded `.tenorrc.json`
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_options(config.options())
            .with_lexicon(config.lexicon())
            .with_emoji(config.emoji())
            .with_test_functions(config.test_functions())
    }

    pub fn with_options(mut self, options: DescriptionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Prefix issue messages with an emoji per kind
    pub fn with_emoji(mut self, emoji: bool) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn with_test_functions(mut self, test_functions: Vec<String>) -> Self {
        self.test_functions = test_functions;
        self
    }

    pub fn options(&self) -> &DescriptionOptions {
        &self.options
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Apply config to filter and adjust issue severity
    fn apply_config_to_issues(
        &self,
        issues: Vec<Issue>,
        config: Option<&Config>,
        test_path: &Path,
    ) -> Vec<Issue> {
        let Some(config) = config else {
            return issues;
        };

        let rules = config.effective_rules(test_path);
        issues
            .into_iter()
            .filter_map(|mut issue| match rules.get(&issue.kind.to_string()) {
                Some(RuleSeverity::Off) => None,
                Some(rs) => {
                    if let Some(sev) = rs.to_severity() {
                        issue.severity = sev;
                    }
                    Some(issue)
                }
                None => Some(issue),
            })
            .collect()
    }

    /// Lint a test file and return its report
    pub fn lint(&self, test_path: &Path, config: Option<&Config>) -> Result<FileReport> {
        let source = fs::read_to_string(test_path)
            .with_context(|| format!("Failed to read test file: {}", test_path.display()))?;
        self.lint_source(&source, test_path, config)
    }

    /// Lint test source from a string (e.g. stdin or an editor buffer).
    /// The path selects the grammar and the per-path config overrides; it is not read.
    pub fn lint_source(
        &self,
        source: &str,
        virtual_path: &Path,
        config: Option<&Config>,
    ) -> Result<FileReport> {
        let mut parser = TypeScriptParser::for_file(virtual_path)
            .with_context(|| format!("Failed to create parser for {}", virtual_path.display()))?;
        let tree = parser
            .parse(source)
            .with_context(|| format!("Failed to parse test file: {}", virtual_path.display()))?;

        Ok(self.lint_core(source, &tree, virtual_path, config))
    }

    fn lint_core(
        &self,
        source: &str,
        tree: &Tree,
        test_path: &Path,
        config: Option<&Config>,
    ) -> FileReport {
        let literals = TestFileParser::new(source).extract_descriptions(tree, &self.test_functions);
        let index = LineIndex::new(source);
        let directives = IgnoreDirectives::from_tree(tree, source);
        let rules = config.map(|c| c.effective_rules(test_path)).unwrap_or_default();
        let enabled_on = |line: usize, kind: ViolationKind| {
            !directives.is_ignored(line, kind)
                && rules.get(&kind.to_string()) != Some(&RuleSeverity::Off)
        };

        let issues: Vec<Issue> = literals
            .iter()
            .filter_map(|literal| {
                let Analysis::Violation(violation) =
                    analyze(&literal.description, &self.options, &self.lexicon)
                else {
                    return None;
                };
                let issue_line = index.position(violation.span.start).0;
                if !enabled_on(issue_line, violation.kind) {
                    return None;
                }
                // disabled kinds also end the repair chain
                let literal_line = index.position(literal.description.start).0;
                Some(self.issue_for(literal, violation, &index, |kind| {
                    enabled_on(literal_line, kind)
                }))
            })
            .collect();

        let issues = self.apply_config_to_issues(issues, config, test_path);

        tracing::debug!(
            file = %test_path.display(),
            descriptions = literals.len(),
            issues = issues.len(),
            "linted file"
        );

        FileReport {
            file_path: test_path.to_path_buf(),
            descriptions_checked: literals.len(),
            issues,
        }
    }

    fn issue_for(
        &self,
        literal: &DescriptionLiteral,
        violation: Violation,
        index: &LineIndex,
        enabled: impl Fn(ViolationKind) -> bool,
    ) -> Issue {
        let description = &literal.description;
        let fix = violation.fix.map(|replacement| {
            let outcome = fix_to_fixpoint_with(description, &self.options, &self.lexicon, enabled);
            Fix {
                range: description.span(),
                replacement: replacement.literal,
                final_replacement: outcome.literal(),
                passes: outcome.passes(),
            }
        });

        Issue {
            kind: violation.kind,
            severity: Severity::Warning,
            message: messages::display_message(violation.kind, self.emoji),
            description: description.text.clone(),
            location: index.location(violation.span.start, violation.span.end),
            span: violation.span,
            fix,
        }
    }

    /// Lint multiple test files sequentially
    pub fn lint_many(&self, paths: &[&Path], config: Option<&Config>) -> Vec<Result<FileReport>> {
        paths.iter().map(|p| self.lint(p, config)).collect()
    }

    /// Lint multiple test files in parallel using rayon
    pub fn lint_parallel(&self, paths: &[PathBuf], config: Option<&Config>) -> Vec<Result<FileReport>> {
        use rayon::prelude::*;

        paths.par_iter().map(|p| self.lint(p, config)).collect()
    }

    /// Totals across several file reports
    pub fn aggregate_stats(reports: &[FileReport]) -> AggregateStats {
        reports.iter().fold(AggregateStats::default(), |mut stats, report| {
            stats.files_analyzed += 1;
            stats.descriptions_checked += report.descriptions_checked;
            stats.total_issues += report.issues.len();
            stats.errors += report.count(Severity::Error);
            stats.warnings += report.count(Severity::Warning);
            stats.fixable += report.fixable();
            stats
        })
    }
}

impl Default for LintEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics from multiple file reports
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub files_analyzed: usize,
    pub descriptions_checked: usize,
    pub total_issues: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Issues that carry an autofix
    pub fixable: usize,
}
