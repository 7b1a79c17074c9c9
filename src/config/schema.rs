//! Config schema and deserialization

use crate::analyzer::description::DescriptionOptions;
use crate::lexicon::Lexicon;
use crate::parser::DEFAULT_TEST_FUNCTIONS;
use crate::ViolationKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name suffixes treated as test files when `testPatterns` is not set
pub const DEFAULT_TEST_PATTERNS: &[&str] = &[
    ".test.ts",
    ".test.tsx",
    ".spec.ts",
    ".spec.tsx",
    ".test.js",
    ".test.jsx",
    ".spec.js",
    ".spec.jsx",
];

/// Per-kind severity override (error, warning, info, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
    /// Drop issues of this kind entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<crate::Severity> {
        match self {
            RuleSeverity::Error => Some(crate::Severity::Error),
            RuleSeverity::Warning => Some(crate::Severity::Warning),
            RuleSeverity::Info => Some(crate::Severity::Info),
            RuleSeverity::Off => None,
        }
    }
}

/// Project additions to the built-in verb tables
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexiconConfig {
    #[serde(default)]
    pub regular_verbs: Vec<String>,
    /// Base form -> third-person singular form
    #[serde(default)]
    pub irregular_verbs: HashMap<String, String>,
    #[serde(default)]
    pub vague_verbs: Vec<String>,
}

impl LexiconConfig {
    pub fn is_empty(&self) -> bool {
        self.regular_verbs.is_empty() && self.irregular_verbs.is_empty() && self.vague_verbs.is_empty()
    }

    fn merge_from(&mut self, base: LexiconConfig) {
        self.regular_verbs.splice(0..0, base.regular_verbs);
        self.vague_verbs.splice(0..0, base.vague_verbs);
        for (verb, third) in base.irregular_verbs {
            self.irregular_verbs.entry(verb).or_insert(third);
        }
    }
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Severity overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,
}

impl ConfigOverride {
    /// True when any glob matches the path or one of its trailing sub-paths,
    /// so `src/legacy/**` also matches `/home/me/app/src/legacy/a.test.ts`
    fn applies_to(&self, file_path: &Path) -> bool {
        let matchers: Vec<globset::GlobMatcher> = self
            .files
            .iter()
            .filter_map(|pattern| globset::Glob::new(pattern).ok())
            .map(|glob| glob.compile_matcher())
            .collect();
        let components: Vec<_> = file_path.components().collect();
        (0..components.len()).any(|skip| {
            let tail: PathBuf = components[skip..].iter().collect();
            matchers.iter().any(|m| m.is_match(&tail))
        })
    }
}

/// Root config structure for .tenorrc.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default)]
    pub extends: Option<String>,

    /// Report descriptions opening with should/could/may/might
    #[serde(default)]
    pub no_vague_verbs: Option<bool>,

    /// Report `if` clauses that should use `when`
    #[serde(default)]
    pub prefer_when_to_if: Option<bool>,

    /// Prefix messages with an emoji per kind
    #[serde(default)]
    pub emoji: Option<bool>,

    /// Per-kind severity overrides. Key is the kind id in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    /// Glob patterns for files/directories to exclude
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Custom test file suffixes (default: *.test.ts, *.spec.ts, ...)
    #[serde(default)]
    pub test_patterns: Vec<String>,

    /// Callee names whose first argument is a description (default: `it`)
    #[serde(default)]
    pub test_functions: Vec<String>,

    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Per-path severity overrides (legacy folders, generated tests, ...)
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI flags into config. A flag given on the command line always wins;
    /// an absent flag leaves the file value alone.
    pub fn merge_with_cli(mut self, no_vague_verbs: bool, prefer_when_to_if: bool, emoji: bool) -> Self {
        if no_vague_verbs {
            self.no_vague_verbs = Some(true);
        }
        if prefer_when_to_if {
            self.prefer_when_to_if = Some(true);
        }
        if emoji {
            self.emoji = Some(true);
        }
        self
    }

    /// Opt-in checks enabled by this config
    pub fn options(&self) -> DescriptionOptions {
        DescriptionOptions {
            no_vague_verbs: self.no_vague_verbs.unwrap_or(false),
            prefer_when_to_if: self.prefer_when_to_if.unwrap_or(false),
        }
    }

    pub fn emoji(&self) -> bool {
        self.emoji.unwrap_or(false)
    }

    /// Built-in lexicon extended with the `lexicon` section
    pub fn lexicon(&self) -> Lexicon {
        crate::lexicon::builtin()
            .clone()
            .with_regular_verbs(self.lexicon.regular_verbs.iter().cloned())
            .with_irregular_verbs(self.lexicon.irregular_verbs.clone())
            .with_vague_verbs(self.lexicon.vague_verbs.iter().cloned())
    }

    /// Test function names, falling back to `it`
    pub fn test_functions(&self) -> Vec<String> {
        if self.test_functions.is_empty() {
            DEFAULT_TEST_FUNCTIONS.iter().map(|f| f.to_string()).collect()
        } else {
            self.test_functions.clone()
        }
    }

    /// Configured severity for a kind, if any
    pub fn rule_severity(&self, kind: ViolationKind) -> Option<RuleSeverity> {
        self.rules.get(&kind.to_string()).copied()
    }

    /// Rule ids that do not name a known kind
    pub fn unknown_rules(&self) -> Vec<&str> {
        let overrides = self.overrides.iter().flat_map(|o| o.rules.keys());
        let mut unknown: Vec<&str> = self
            .rules
            .keys()
            .chain(overrides)
            .filter(|id| ViolationKind::from_id(id).is_none())
            .map(String::as_str)
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    /// Rule severities for `file_path`: `rules`, then each matching override in order
    pub fn effective_rules(&self, file_path: &Path) -> HashMap<String, RuleSeverity> {
        let mut rules = self.rules.clone();
        self.overrides
            .iter()
            .filter(|o| o.applies_to(file_path))
            .for_each(|o| rules.extend(o.rules.iter().map(|(id, sev)| (id.clone(), *sev))));
        rules
    }

    /// Fold an extended (base) config underneath this one
    pub fn merge_from(&mut self, base: Config) {
        let Config {
            extends,
            no_vague_verbs,
            prefer_when_to_if,
            emoji,
            rules,
            ignore,
            test_patterns,
            test_functions,
            lexicon,
            overrides,
        } = base;

        self.extends = self.extends.take().or(extends);
        self.no_vague_verbs = self.no_vague_verbs.or(no_vague_verbs);
        self.prefer_when_to_if = self.prefer_when_to_if.or(prefer_when_to_if);
        self.emoji = self.emoji.or(emoji);

        for (id, severity) in rules {
            self.rules.entry(id).or_insert(severity);
        }
        self.ignore.splice(0..0, ignore);
        if self.test_patterns.is_empty() {
            self.test_patterns = test_patterns;
        }
        if self.test_functions.is_empty() {
            self.test_functions = test_functions;
        }
        self.lexicon.merge_from(lexicon);
        // base overrides run first
        self.overrides.splice(0..0, overrides);
    }

    /// Test file suffixes in effect
    pub fn get_test_patterns(&self) -> Vec<&str> {
        if self.test_patterns.is_empty() {
            DEFAULT_TEST_PATTERNS.to_vec()
        } else {
            self.test_patterns.iter().map(|s| s.as_str()).collect()
        }
    }
}
