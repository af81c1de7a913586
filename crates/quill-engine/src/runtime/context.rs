//! Execution context for embedders.

use super::environment::Environment;
use super::value::Value;
use crate::error::Result;
use crate::interpreter::{evaluate, evaluate_program};
use crate::parser::{parse, parse_expression};

/// An execution context owning a global environment.
///
/// Bindings made by one `eval` call stay visible to the next.
#[derive(Debug, Clone, Default)]
pub struct Context {
    global: Environment,
}

impl Context {
    /// Creates a new execution context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The global environment.
    pub fn global(&self) -> &Environment {
        &self.global
    }

    /// Evaluates a program, returning the value of its last statement.
    pub fn eval(&self, source: &str) -> Result<Value> {
        let program = parse(source)?;
        evaluate_program(&program, &self.global)
    }

    /// Evaluates a single expression.
    pub fn eval_expression(&self, source: &str) -> Result<Value> {
        let node = parse_expression(source)?;
        evaluate(&node, &self.global)
    }
}
