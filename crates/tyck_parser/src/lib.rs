//! tyck_parser: recursive descent parser producing [`SyntaxTree`]s.
//!
//! Syntax errors never abort a parse; they are recorded on the tree and the
//! parser recovers at the next statement boundary.

mod parser;
mod precedence;

pub use parser::Parser;

use std::sync::Arc;

use tyck_ast::SyntaxTree;
use tyck_core::intern::StringInterner;

/// Parse `text` into a tree whose names are interned in `interner`.
pub fn parse_source(file_name: &str, text: &str, interner: &StringInterner) -> Arc<SyntaxTree> {
    Arc::new(Parser::new(file_name, Arc::from(text), interner.clone()).parse_source_file())
}
