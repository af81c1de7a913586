// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # quill-engine
//!
//! A small tree-walking interpreter for a JavaScript-like language.
//!
//! ## Overview
//!
//! Source text goes through three stages:
//! - [`lexer`]: a lazy scanner producing one token at a time, told by the
//!   parser whether an operand or an operator is expected next
//! - [`parser`]: a Pratt parser with automatic semicolon insertion,
//!   producing the syntax tree in [`ast`]
//! - [`interpreter`]: evaluates the tree against a chain of
//!   [`Environment`] frames using the coercions in [`runtime::conversions`]
//!
//! ## Quick Start
//!
//! ```rust
//! use quill_engine::{Context, Value};
//!
//! let ctx = Context::new();
//! ctx.eval("function square(x) { return x * x }").unwrap();
//! assert_eq!(ctx.eval("square(7)").unwrap(), Value::Number(49.0));
//! assert_eq!(ctx.eval("'foo' + 1").unwrap(), Value::from("foo1"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod runtime;

pub use error::{Error, Result};
pub use interpreter::{evaluate, evaluate_program};
pub use parser::{parse, parse_expression};
pub use runtime::{Context, Environment, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline() {
        let program = parse("var a = 2; a * 21").unwrap();
        let env = Environment::new();
        assert_eq!(evaluate_program(&program, &env).unwrap(), Value::Number(42.0));
    }

    #[test]
    fn test_syntax_errors_surface_from_eval() {
        let ctx = Context::new();
        let err = ctx.eval("1 +").unwrap_err();
        assert!(err.is_syntax_error());
    }
}
