//! Tree-walking evaluation of syntax trees.
//!
//! Every node, statement or expression, executes to a [`Completion`]. An
//! expression always completes normally; statements can also complete with
//! `return`, `break` or `continue`, which propagate outward through blocks
//! until a loop or function call consumes them.

use super::operators;
use crate::ast::{
    AssignmentExpression, BinaryExpression, BinaryOperator, CallExpression, ForStatement, Node,
    Program, UnaryExpression, UnaryOperator, UpdateExpression, WhileStatement,
};
use crate::error::{Error, Result};
use crate::runtime::conversions::{to_boolean, to_number, to_string};
use crate::runtime::{Environment, Function, Value};
use std::rc::Rc;
use tracing::instrument;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Ran to the end, producing a value
    Normal(Value),
    /// `return`, carrying the returned value
    Return(Value),
    /// `break`
    Break,
    /// `continue`
    Continue,
}

/// Evaluates a program in `env`, returning the value of the last statement
/// executed, or the value of a top-level `return`.
#[instrument(level = "debug", skip_all, fields(statements = program.body.len()))]
pub fn evaluate_program(program: &Program, env: &Environment) -> Result<Value> {
    completion_value(execute_statements(&program.body, env)?)
}

/// Evaluates a single node in `env`.
pub fn evaluate(node: &Node, env: &Environment) -> Result<Value> {
    completion_value(execute(node, env)?)
}

fn completion_value(completion: Completion) -> Result<Value> {
    match completion {
        Completion::Normal(value) | Completion::Return(value) => Ok(value),
        Completion::Break | Completion::Continue => Err(Error::Internal(
            "loop control outside of a loop".into(),
        )),
    }
}

/// Executes statements in order in `env` without opening a new frame.
///
/// Stops at the first abrupt completion; otherwise completes with the
/// value of the last statement.
pub fn execute_statements(statements: &[Node], env: &Environment) -> Result<Completion> {
    let mut last = Value::Undefined;
    for statement in statements {
        match execute(statement, env)? {
            Completion::Normal(value) => last = value,
            abrupt => return Ok(abrupt),
        }
    }
    Ok(Completion::Normal(last))
}

/// Executes one node.
pub fn execute(node: &Node, env: &Environment) -> Result<Completion> {
    let value = match node {
        // Literals
        Node::Number(n) => Value::Number(*n),
        Node::Boolean(b) => Value::Boolean(*b),
        Node::String(s) => Value::String(s.clone()),
        Node::RegExp { pattern, flags } => Value::String(format!("/{}/{}", pattern, flags)),
        Node::Null => Value::Null,
        Node::Identifier(name) => env.read(name),

        // Operators
        Node::Unary(unary) => unary_expression(unary, env)?,
        Node::Update(update) => update_expression(update, env)?,
        Node::Binary(binary) => binary_expression(binary, env)?,
        Node::PropertyAccess(access) => {
            // No value has properties
            value(&access.object, env)?;
            value(&access.property, env)?;
            Value::Undefined
        }
        Node::Assignment(assignment) => assignment_expression(assignment, env)?,
        Node::Condition(condition) => {
            if to_boolean(&value(&condition.test, env)?) {
                value(&condition.consequent, env)?
            } else {
                value(&condition.alternate, env)?
            }
        }
        Node::FunctionCall(call) => call_expression(call, env)?,
        Node::Function(definition) => {
            Value::Function(Rc::new(Function::expression(definition, env.clone())))
        }

        // Statements
        Node::FunctionDeclaration(definition) => {
            let function = Value::Function(Rc::new(Function::declaration(definition, env.clone())));
            if let Some(name) = &definition.name {
                env.declare(name.clone(), function.clone());
            }
            function
        }
        Node::Block(statements) => return execute_statements(statements, &env.child()),
        Node::VariableStatement(declarations) => {
            for declaration in declarations {
                let initial = match &declaration.init {
                    Some(init) => value(init, env)?,
                    None => Value::Undefined,
                };
                env.declare(declaration.name.clone(), initial);
            }
            Value::Undefined
        }
        Node::Return(argument) => {
            let returned = match argument {
                Some(argument) => value(argument, env)?,
                None => Value::Undefined,
            };
            return Ok(Completion::Return(returned));
        }
        Node::If(statement) => {
            if to_boolean(&value(&statement.test, env)?) {
                return execute(&statement.consequent, env);
            }
            match &statement.alternate {
                Some(alternate) => return execute(alternate, env),
                None => Value::Undefined,
            }
        }
        Node::While(statement) => return while_statement(statement, env),
        Node::DoWhile(statement) => return do_while_statement(statement, env),
        Node::For(statement) => return for_statement(statement, env),
        Node::Break => return Ok(Completion::Break),
        Node::Continue => return Ok(Completion::Continue),
        Node::Empty => Value::Undefined,
    };

    Ok(Completion::Normal(value))
}

/// Evaluates a node that must produce a value.
fn value(node: &Node, env: &Environment) -> Result<Value> {
    match execute(node, env)? {
        Completion::Normal(value) => Ok(value),
        other => Err(Error::Internal(format!(
            "{:?} completion in expression position",
            other
        ))),
    }
}

/// What a loop body's completion means for the loop.
enum LoopStep {
    Next,
    Exit,
    Propagate(Completion),
}

fn loop_step(completion: Completion, last: &mut Value) -> LoopStep {
    match completion {
        Completion::Normal(value) => {
            *last = value;
            LoopStep::Next
        }
        Completion::Continue => LoopStep::Next,
        Completion::Break => LoopStep::Exit,
        Completion::Return(value) => LoopStep::Propagate(Completion::Return(value)),
    }
}

fn while_statement(statement: &WhileStatement, env: &Environment) -> Result<Completion> {
    let mut last = Value::Undefined;
    while to_boolean(&value(&statement.test, env)?) {
        match loop_step(execute(&statement.body, env)?, &mut last) {
            LoopStep::Next => {}
            LoopStep::Exit => break,
            LoopStep::Propagate(completion) => return Ok(completion),
        }
    }
    Ok(Completion::Normal(last))
}

fn do_while_statement(statement: &WhileStatement, env: &Environment) -> Result<Completion> {
    let mut last = Value::Undefined;
    loop {
        match loop_step(execute(&statement.body, env)?, &mut last) {
            LoopStep::Next => {}
            LoopStep::Exit => break,
            LoopStep::Propagate(completion) => return Ok(completion),
        }
        if !to_boolean(&value(&statement.test, env)?) {
            break;
        }
    }
    Ok(Completion::Normal(last))
}

fn for_statement(statement: &ForStatement, env: &Environment) -> Result<Completion> {
    if let Some(init) = &statement.init {
        execute(init, env)?;
    }

    let mut last = Value::Undefined;
    loop {
        if let Some(test) = &statement.test {
            if !to_boolean(&value(test, env)?) {
                break;
            }
        }
        match loop_step(execute(&statement.body, env)?, &mut last) {
            LoopStep::Next => {}
            LoopStep::Exit => break,
            LoopStep::Propagate(completion) => return Ok(completion),
        }
        if let Some(update) = &statement.update {
            value(update, env)?;
        }
    }
    Ok(Completion::Normal(last))
}

fn unary_expression(unary: &UnaryExpression, env: &Environment) -> Result<Value> {
    if unary.operator == UnaryOperator::Delete {
        return delete(&unary.argument, env);
    }
    let operand = value(&unary.argument, env)?;
    Ok(operators::unary(unary.operator, &operand))
}

/// `delete` removes a variable binding; on anything else it only evaluates
/// its operand.
fn delete(argument: &Node, env: &Environment) -> Result<Value> {
    match argument {
        Node::Identifier(name) => Ok(Value::Boolean(env.delete(name))),
        other => {
            value(other, env)?;
            Ok(Value::Boolean(true))
        }
    }
}

fn binary_expression(binary: &BinaryExpression, env: &Environment) -> Result<Value> {
    let left = value(&binary.left, env)?;
    match binary.operator {
        BinaryOperator::And if !to_boolean(&left) => Ok(left),
        BinaryOperator::Or if to_boolean(&left) => Ok(left),
        BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Sequence => {
            value(&binary.right, env)
        }
        operator => {
            let right = value(&binary.right, env)?;
            Ok(operators::binary(operator, &left, &right))
        }
    }
}

fn assignment_expression(assignment: &AssignmentExpression, env: &Environment) -> Result<Value> {
    match assignment.operator.binary() {
        None => update(&assignment.target, env, false, |_| {
            let assigned = value(&assignment.value, env)?;
            Ok((assigned.clone(), assigned))
        }),
        Some(operator) => update(&assignment.target, env, true, |current| {
            let current = current.unwrap_or_default();
            let operand = value(&assignment.value, env)?;
            let result = operators::binary(operator, &current, &operand);
            Ok((result.clone(), result))
        }),
    }
}

fn update_expression(expression: &UpdateExpression, env: &Environment) -> Result<Value> {
    let operator = expression.operator;
    update(&expression.argument, env, true, |current| {
        let old = to_number(&current.unwrap_or_default());
        let new = Value::Number(old + operator.delta());
        let result = if operator.is_postfix() {
            Value::Number(old)
        } else {
            new.clone()
        };
        Ok((new, result))
    })
}

/// A resolved assignment target.
enum Reference {
    Binding(String),
    /// Values have no properties, so writes through this are dropped
    Property,
}

impl Reference {
    fn resolve(target: &Node, env: &Environment) -> Result<Self> {
        match target {
            Node::Identifier(name) => Ok(Reference::Binding(name.clone())),
            Node::PropertyAccess(access) => {
                value(&access.object, env)?;
                value(&access.property, env)?;
                Ok(Reference::Property)
            }
            other => Err(Error::Internal(format!(
                "cannot assign to {:?}",
                other
            ))),
        }
    }

    fn get(&self, env: &Environment) -> Value {
        match self {
            Reference::Binding(name) => env.read(name),
            Reference::Property => Value::Undefined,
        }
    }

    fn put(&self, env: &Environment, value: Value) {
        match self {
            Reference::Binding(name) => env.write(name, value),
            Reference::Property => {}
        }
    }
}

/// The single mutation path shared by assignment and `++`/`--`.
///
/// Resolves `target`, reads its current value when `read_current` is set,
/// and passes it to `transform`, which returns the value to store and the
/// value of the whole expression.
fn update<F>(target: &Node, env: &Environment, read_current: bool, transform: F) -> Result<Value>
where
    F: FnOnce(Option<Value>) -> Result<(Value, Value)>,
{
    let reference = Reference::resolve(target, env)?;
    let current = read_current.then(|| reference.get(env));
    let (stored, result) = transform(current)?;
    reference.put(env, stored);
    Ok(result)
}

fn call_expression(call: &CallExpression, env: &Environment) -> Result<Value> {
    let callee = value(&call.callee, env)?;
    let arguments = call
        .arguments
        .iter()
        .map(|argument| value(argument, env))
        .collect::<Result<Vec<_>>>()?;

    match callee {
        Value::Function(function) => function.call(arguments),
        other => {
            let description = match call.callee.as_ref() {
                Node::Identifier(name) => name.clone(),
                _ => to_string(&other),
            };
            Err(Error::NotCallable(description))
        }
    }
}
