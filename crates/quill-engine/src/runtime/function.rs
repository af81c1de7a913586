//! Function closures.

use super::environment::Environment;
use super::value::Value;
use crate::ast::{FunctionDefinition, Node};
use crate::error::{Error, Result};
use crate::interpreter::{Completion, execute_statements};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// A function value: a definition paired with the environment it was
/// created in.
pub struct Function {
    /// The function name (if any)
    pub name: Option<String>,
    /// The parameter names
    pub params: Vec<String>,
    /// The function body
    pub body: Rc<[Node]>,
    /// The defining environment
    pub env: Environment,
    /// Whether the name is visible inside the body (named function expressions)
    binds_own_name: bool,
}

impl Function {
    /// Creates a closure for a function declaration.
    ///
    /// The declaration's name is bound by the caller in the defining scope.
    pub fn declaration(definition: &FunctionDefinition, env: Environment) -> Self {
        Self::new(definition, env, false)
    }

    /// Creates a closure for a function expression.
    ///
    /// A named expression can call itself by name from its own body.
    pub fn expression(definition: &FunctionDefinition, env: Environment) -> Self {
        Self::new(definition, env, definition.name.is_some())
    }

    fn new(definition: &FunctionDefinition, env: Environment, binds_own_name: bool) -> Self {
        Self {
            name: definition.name.clone(),
            params: definition.params.clone(),
            body: Rc::clone(&definition.body),
            env,
            binds_own_name,
        }
    }

    /// Invokes the function.
    ///
    /// Parameters are bound positionally in a fresh frame under the defining
    /// environment; missing arguments are `undefined` and extra ones are
    /// ignored. Returns the value given to `return`, or `undefined`.
    pub fn call(self: &Rc<Self>, arguments: Vec<Value>) -> Result<Value> {
        trace!(
            function = self.name.as_deref().unwrap_or("<anonymous>"),
            args = arguments.len(),
            "call"
        );

        let frame = self.env.child();
        if self.binds_own_name {
            if let Some(name) = &self.name {
                frame.declare(name.clone(), Value::Function(Rc::clone(self)));
            }
        }

        let mut arguments = arguments.into_iter();
        for param in &self.params {
            frame.declare(param.clone(), arguments.next().unwrap_or_default());
        }

        match execute_statements(&self.body, &frame)? {
            Completion::Return(value) => Ok(value),
            Completion::Normal(_) => Ok(Value::Undefined),
            Completion::Break | Completion::Continue => Err(Error::Internal(
                "loop control escaped a function body".into(),
            )),
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
