//! Parser for source code.
//!
//! Transforms source text into an Abstract Syntax Tree (AST).
//!
//! ## Structure
//!
//! - `parser` - `Parser` state, lookahead and semicolon insertion
//! - `expressions` - Binding powers and prefix/suffix productions
//! - `statements` - Statement grammar
//!
//! ## Usage
//!
//! ```rust
//! use quill_engine::parser::Parser;
//!
//! let mut parser = Parser::new("var x = 1 + 2;");
//! let program = parser.parse_program().expect("Should parse");
//! assert_eq!(program.body.len(), 1);
//! ```

mod expressions;
mod parser;
mod statements;

pub use expressions::binding_power;
pub use parser::Parser;

use crate::ast::{Node, Program};
use crate::error::Result;
use tracing::instrument;

/// Parses a complete program.
#[instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Program> {
    Parser::new(source).parse_program()
}

/// Parses source that must consist of a single expression.
#[instrument(level = "debug", skip(source), fields(len = source.len()))]
pub fn parse_expression(source: &str) -> Result<Node> {
    Parser::new(source).parse_expression()
}
