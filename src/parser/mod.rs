//! Parser module for TypeScript/JavaScript test files

pub mod ignore_directives;
pub mod line_index;
pub mod test_file;
pub mod typescript;

pub use ignore_directives::IgnoreDirectives;
pub use line_index::LineIndex;
pub use test_file::{default_test_functions, DescriptionLiteral, TestFileParser, DEFAULT_TEST_FUNCTIONS};
pub use typescript::TypeScriptParser;
