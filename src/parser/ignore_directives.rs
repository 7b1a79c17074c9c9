//! Parse tenor-ignore comment directives from source

use crate::ViolationKind;
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Tree};

const IGNORE_NEXT_LINE: &str = "tenor-ignore-next-line";
const IGNORE: &str = "tenor-ignore";
const DISABLE: &str = "tenor-disable";
const ENABLE: &str = "tenor-enable";

/// Which kinds are ignored on a given line
#[derive(Debug, Clone)]
pub enum LineIgnoreSet {
    All,
    Kinds(HashSet<ViolationKind>),
}

/// Parsed ignore directives from a file
#[derive(Debug, Default)]
pub struct IgnoreDirectives {
    /// Per-line directives (1-indexed)
    line_kinds: HashMap<usize, LineIgnoreSet>,
    /// Inclusive (start_line, end_line) ranges where everything is disabled
    disabled_ranges: Vec<(usize, usize)>,
}

impl IgnoreDirectives {
    /// Whether an issue of `kind` reported on `line` should be dropped
    pub fn is_ignored(&self, line: usize, kind: ViolationKind) -> bool {
        if let Some(set) = self.line_kinds.get(&line) {
            let ignored = match set {
                LineIgnoreSet::All => true,
                LineIgnoreSet::Kinds(kinds) => kinds.contains(&kind),
            };
            if ignored {
                return true;
            }
        }
        self.disabled_ranges
            .iter()
            .any(|(start, end)| line >= *start && line <= *end)
    }

    pub fn is_empty(&self) -> bool {
        self.line_kinds.is_empty() && self.disabled_ranges.is_empty()
    }

    /// Collect directives from the comment nodes of a parsed file.
    /// Directive text inside strings (including descriptions) is not a directive.
    pub fn from_tree(tree: &Tree, source: &str) -> Self {
        let mut comments = Vec::new();
        collect_comments(tree.root_node(), &mut comments);

        let mut line_kinds: HashMap<usize, LineIgnoreSet> = HashMap::new();
        let mut disabled_ranges = Vec::new();
        let mut disable_start: Option<usize> = None;

        for comment in comments {
            let Some(text) = source.get(comment.byte_range()) else {
                continue;
            };
            let text = comment_body(text);
            let first_line = comment.start_position().row + 1;
            let last_line = comment.end_position().row + 1;

            if text.contains(IGNORE_NEXT_LINE) {
                line_kinds.insert(last_line + 1, LineIgnoreSet::All);
            } else if let Some(idx) = text.find(IGNORE) {
                line_kinds.insert(first_line, parse_kind_list(&text[idx + IGNORE.len()..]));
            }

            if text.contains(DISABLE) {
                disable_start.get_or_insert(first_line);
            }
            if text.contains(ENABLE) {
                if let Some(start) = disable_start.take() {
                    disabled_ranges.push((start, last_line));
                }
            }
        }

        // An unterminated disable runs to the end of the file
        if let Some(start) = disable_start {
            let end = source.lines().count().max(1);
            disabled_ranges.push((start, end));
        }

        Self {
            line_kinds,
            disabled_ranges,
        }
    }
}

fn collect_comments<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "comment" {
        out.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments(child, out);
    }
}

/// Comment text without its `//`, `/*` or `*/` markers
fn comment_body(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("//")
        .or_else(|| text.strip_prefix("/*"))
        .unwrap_or(text);
    text.strip_suffix("*/").unwrap_or(text).trim()
}

/// A bare `tenor-ignore` ignores every kind; listed ids ignore only those kinds
fn parse_kind_list(s: &str) -> LineIgnoreSet {
    let ids: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .collect();
    if ids.is_empty() {
        return LineIgnoreSet::All;
    }

    let mut kinds = HashSet::new();
    for id in ids {
        match ViolationKind::from_id(id) {
            Some(kind) => {
                kinds.insert(kind);
            }
            None => tracing::warn!(id, "unknown kind in tenor-ignore directive"),
        }
    }
    LineIgnoreSet::Kinds(kinds)
}
