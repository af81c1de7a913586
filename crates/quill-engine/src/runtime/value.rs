//! Runtime value representation.

use super::conversions;
use super::function::Function;
use std::fmt;
use std::rc::Rc;

/// A runtime value.
///
/// Functions are reference-counted closures; every other variant is a
/// plain value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// undefined
    #[default]
    Undefined,
    /// null
    Null,
    /// Boolean value
    Boolean(bool),
    /// Number (IEEE 754 double)
    Number(f64),
    /// String
    String(String),
    /// Function closure
    Function(Rc<Function>),
}

/// Strict equality: values of different types are never equal, NaN is not
/// equal to itself and `+0` equals `-0`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns true if this value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns the number if this value is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the result of the `typeof` operator.
    ///
    /// Only numbers, strings and undefined have their own type names;
    /// everything else, functions and booleans included, is "object".
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Null | Value::Boolean(_) | Value::Function(_) => "object",
        }
    }

    /// Maps `undefined` and `null` to `None` for host code.
    pub fn into_option(self) -> Option<Value> {
        match self {
            Value::Undefined | Value::Null => None,
            other => Some(other),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&conversions::to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_signed_zeros_are_equal() {
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
    }

    #[test]
    fn test_different_types_are_unequal() {
        assert_ne!(Value::Undefined, Value::Null);
        assert_ne!(Value::from("1"), Value::from(1.0));
        assert_ne!(Value::from(false), Value::from(0.0));
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Number(1.0).type_of(), "number");
        assert_eq!(Value::from("x").type_of(), "string");
        assert_eq!(Value::Undefined.type_of(), "undefined");
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::Boolean(true).type_of(), "object");
    }

    #[test]
    fn test_into_option() {
        assert_eq!(Value::Undefined.into_option(), None);
        assert_eq!(Value::Null.into_option(), None);
        assert_eq!(Value::from(2.0).into_option(), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_display_uses_string_conversion() {
        assert_eq!(Value::Number(3.0).to_string(), "3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Undefined.to_string(), "undefined");
        assert_eq!(Value::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_default_is_undefined() {
        assert!(Value::default().is_undefined());
    }
}
