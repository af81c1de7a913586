//! The tree-walking interpreter.
//!
//! [`evaluator`] walks syntax trees; [`operators`] and [`comparison`] hold
//! the operator semantics applied to already-evaluated operands.

pub mod comparison;
pub mod evaluator;
pub mod operators;

pub use evaluator::{Completion, evaluate, evaluate_program, execute, execute_statements};
