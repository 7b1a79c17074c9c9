//! Test file parser - extracts description literals from test declarations

use crate::Description;
use tree_sitter::{Node, Tree};

/// Callee names treated as test declarations when no config says otherwise
pub const DEFAULT_TEST_FUNCTIONS: &[&str] = &["it"];

/// A plain string literal passed as the first argument of a test function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionLiteral {
    /// Name of the test function (`it`, `test`, ...)
    pub callee: String,
    /// The literal text and its byte range in the file
    pub description: Description,
}

/// Parser for extracting test descriptions from TypeScript/JavaScript test files
pub struct TestFileParser<'a> {
    source: &'a str,
}

impl<'a> TestFileParser<'a> {
    /// Create a new test file parser
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Extract every literal description passed to one of `test_functions`, in source order.
    ///
    /// Template literals and computed descriptions are skipped: only `'...'`
    /// and `"..."` strings can be analyzed and rewritten.
    pub fn extract_descriptions(
        &self,
        tree: &Tree,
        test_functions: &[String],
    ) -> Vec<DescriptionLiteral> {
        let mut literals = Vec::new();
        self.visit_node(tree.root_node(), test_functions, &mut literals);
        literals
    }

    fn visit_node(&self, node: Node, test_functions: &[String], out: &mut Vec<DescriptionLiteral>) {
        if node.kind() == "call_expression" {
            if let Some(literal) = self.try_parse_description(node, test_functions) {
                out.push(literal);
            }
        }

        // Tests can be declared anywhere (describe bodies, helpers), so recurse everywhere
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit_node(child, test_functions, out);
        }
    }

    fn try_parse_description(
        &self,
        node: Node,
        test_functions: &[String],
    ) -> Option<DescriptionLiteral> {
        let function = node.child_by_field_name("function")?;
        if function.kind() != "identifier" {
            return None;
        }
        let callee = self.node_text(function);
        if !test_functions.iter().any(|f| f == callee) {
            return None;
        }

        let args = node.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let first_arg = args.named_children(&mut cursor).next()?;
        if first_arg.kind() != "string" {
            return None;
        }

        let raw = self.node_text(first_arg);
        match Description::from_literal(raw, first_arg.start_byte()) {
            Ok(description) => Some(DescriptionLiteral {
                callee: callee.to_string(),
                description,
            }),
            Err(e) => {
                tracing::debug!(
                    line = first_arg.start_position().row + 1,
                    error = %e,
                    "skipping malformed description literal"
                );
                None
            }
        }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Test function names as owned strings, for callers without a config
pub fn default_test_functions() -> Vec<String> {
    DEFAULT_TEST_FUNCTIONS.iter().map(|f| f.to_string()).collect()
}
