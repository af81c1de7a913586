//! Runtime types and execution context.

pub mod context;
pub mod conversions;
pub mod environment;
pub mod function;
pub mod value;

pub use context::Context;
pub use environment::Environment;
pub use function::Function;
pub use value::Value;
