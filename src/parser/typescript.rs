//! TypeScript/JavaScript parser using tree-sitter

use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Language, Parser, Tree};

/// Parser for TypeScript and JavaScript test files
pub struct TypeScriptParser {
    parser: Parser,
}

impl TypeScriptParser {
    /// Create a new TypeScript parser
    pub fn new() -> Result<Self> {
        Self::with_language(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "TypeScript")
    }

    /// Create a new TSX parser (also used for JSX)
    pub fn new_tsx() -> Result<Self> {
        Self::with_language(tree_sitter_typescript::LANGUAGE_TSX.into(), "TSX")
    }

    fn with_language(language: Language, name: &str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .with_context(|| format!("Failed to set {} language", name))?;
        Ok(Self { parser })
    }

    /// Create a parser based on file extension
    pub fn for_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "tsx" | "jsx" => Self::new_tsx(),
            _ => Self::new(),
        }
    }

    /// Parse source code into a syntax tree
    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .context("Failed to parse test source")
    }
}
