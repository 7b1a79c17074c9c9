//! Verb lexicon consulted by the description analyzer
//!
//! The tables are hand-curated and intentionally incomplete: a first word the
//! lexicon does not know is never reported. Projects can extend the tables
//! through the `lexicon` section of `.tenorrc.json`.

pub mod messages;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Verbs whose third-person singular form is the base form plus a final "s"
pub const REGULAR_VERBS: &[&str] = &[
    "accept",
    "add",
    "allow",
    "build",
    "call",
    "change",
    "close",
    "create",
    "disable",
    "display",
    "execute",
    "fire",
    "format",
    "get",
    "hide",
    "include",
    "initialize",
    "invoke",
    "load",
    "make",
    "mark",
    "mount",
    "open",
    "perform",
    "prefill",
    "redirect",
    "reject",
    "remain",
    "remove",
    "rename",
    "render",
    "return",
    "revert",
    "run",
    "select",
    "set",
    "show",
    "submit",
    "toggle",
    "track",
    "throw",
    "trigger",
];

/// Verbs that need a lookup to be conjugated with "it"
pub const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("apply", "applies"),
    ("be", "is"),
    ("dispatch", "dispatches"),
    ("do", "does"),
    ("go", "goes"),
    ("have", "has"),
    ("don't", "doesn't"),
];

/// Modal verbs that make a description non-assertive
pub const VAGUE_VERBS: &[&str] = &["should", "could", "may", "might"];

/// Lookup tables for regular, irregular and vague verbs
#[derive(Debug, Clone)]
pub struct Lexicon {
    regular: HashSet<String>,
    irregular: HashMap<String, String>,
    vague: HashSet<String>,
}

impl Lexicon {
    /// Lexicon with the built-in tables only
    pub fn new() -> Self {
        Self {
            regular: REGULAR_VERBS.iter().map(|v| v.to_string()).collect(),
            irregular: IRREGULAR_VERBS
                .iter()
                .map(|(base, third)| (base.to_string(), third.to_string()))
                .collect(),
            vague: VAGUE_VERBS.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Add regular verbs (base form)
    pub fn with_regular_verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regular.extend(verbs.into_iter().map(Into::into));
        self
    }

    /// Add irregular verbs as (base form, third-person form) pairs
    pub fn with_irregular_verbs<I, K, V>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (base, third) in verbs {
            self.irregular.insert(base.into(), third.into());
        }
        self
    }

    /// Add vague (modal) verbs
    pub fn with_vague_verbs<I, S>(mut self, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vague.extend(verbs.into_iter().map(Into::into));
        self
    }

    pub fn is_regular_verb(&self, word: &str) -> bool {
        self.regular.contains(word)
    }

    /// Third-person singular form of an irregular verb
    pub fn third_person(&self, word: &str) -> Option<&str> {
        self.irregular.get(word).map(String::as_str)
    }

    pub fn is_vague_verb(&self, word: &str) -> bool {
        self.vague.contains(word)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared built-in lexicon (built once per process).
pub fn builtin() -> &'static Lexicon {
    static LEXICON: OnceLock<Lexicon> = OnceLock::new();
    LEXICON.get_or_init(Lexicon::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_loaded() {
        let lexicon = Lexicon::new();
        assert!(lexicon.is_regular_verb("make"));
        assert!(lexicon.is_regular_verb("return"));
        assert!(!lexicon.is_regular_verb("returns"));
        assert_eq!(lexicon.third_person("do"), Some("does"));
        assert_eq!(lexicon.third_person("don't"), Some("doesn't"));
        assert_eq!(lexicon.third_person("does"), None);
        assert!(lexicon.is_vague_verb("might"));
        assert!(!lexicon.is_vague_verb("must"));
    }

    #[test]
    fn extensions_add_without_removing_builtins() {
        let lexicon = Lexicon::new()
            .with_regular_verbs(["fetch", "emit"])
            .with_irregular_verbs([("catch", "catches")])
            .with_vague_verbs(["must"]);
        assert!(lexicon.is_regular_verb("emit"));
        assert!(lexicon.is_regular_verb("make"));
        assert_eq!(lexicon.third_person("catch"), Some("catches"));
        assert_eq!(lexicon.third_person("go"), Some("goes"));
        assert!(lexicon.is_vague_verb("must"));
        assert!(lexicon.is_vague_verb("should"));
    }

    #[test]
    fn extending_a_builtin_clone_leaves_the_builtin_alone() {
        let extended = builtin().clone().with_regular_verbs(["fetch"]);
        assert!(extended.is_regular_verb("fetch"));
        assert!(!builtin().is_regular_verb("fetch"));
        assert!(std::ptr::eq(builtin(), builtin()));
    }

    #[test]
    fn tables_do_not_overlap() {
        for verb in REGULAR_VERBS {
            assert!(
                !IRREGULAR_VERBS.iter().any(|(base, _)| base == verb),
                "{} is both regular and irregular",
                verb
            );
            assert!(!VAGUE_VERBS.contains(verb));
        }
    }
}
