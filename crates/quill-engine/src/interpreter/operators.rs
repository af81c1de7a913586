//! Operator semantics on already-evaluated operands.
//!
//! Short-circuiting (`&&`, `||`, `?:`) needs unevaluated operands and lives
//! in the evaluator; the versions here are what compound assignment uses.

use super::comparison::{abstract_equals, relational, strict_equals};
use crate::ast::{BinaryOperator, UnaryOperator};
use crate::runtime::conversions::{
    shift_count, to_boolean, to_int32, to_number, to_string, to_uint32,
};
use crate::runtime::value::Value;

/// Applies a binary operator.
pub fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    match operator {
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Subtract => Value::Number(to_number(left) - to_number(right)),
        BinaryOperator::Multiply => Value::Number(to_number(left) * to_number(right)),
        BinaryOperator::Divide => Value::Number(to_number(left) / to_number(right)),
        // `%` truncates like fmod, so the result takes the dividend's sign
        BinaryOperator::Modulus => Value::Number(to_number(left) % to_number(right)),

        BinaryOperator::And => {
            if to_boolean(left) {
                right.clone()
            } else {
                left.clone()
            }
        }
        BinaryOperator::Or => {
            if to_boolean(left) {
                left.clone()
            } else {
                right.clone()
            }
        }

        BinaryOperator::BitwiseAnd => int32(to_int32(left) & to_int32(right)),
        BinaryOperator::BitwiseOr => int32(to_int32(left) | to_int32(right)),
        BinaryOperator::BitwiseXOr => int32(to_int32(left) ^ to_int32(right)),
        BinaryOperator::LeftShift => int32(to_int32(left).wrapping_shl(shift_count(right))),
        BinaryOperator::SignedRightShift => int32(to_int32(left) >> shift_count(right)),
        BinaryOperator::UnsignedRightShift => {
            Value::Number(f64::from(to_uint32(left) >> shift_count(right)))
        }

        BinaryOperator::LessThan
        | BinaryOperator::GreaterThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThanOrEqual => {
            Value::Boolean(relational(operator, left, right))
        }
        BinaryOperator::Equal => Value::Boolean(abstract_equals(left, right)),
        BinaryOperator::NotEqual => Value::Boolean(!abstract_equals(left, right)),
        BinaryOperator::StrictlyEqual => Value::Boolean(strict_equals(left, right)),
        BinaryOperator::StrictlyNotEqual => Value::Boolean(!strict_equals(left, right)),

        BinaryOperator::Sequence => right.clone(),
    }
}

/// `+` concatenates when either operand is a string, otherwise adds.
fn add(left: &Value, right: &Value) -> Value {
    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
        let mut result = to_string(left);
        result.push_str(&to_string(right));
        Value::String(result)
    } else {
        Value::Number(to_number(left) + to_number(right))
    }
}

fn int32(n: i32) -> Value {
    Value::Number(f64::from(n))
}

/// Applies a unary operator other than `delete`.
///
/// `delete` acts on a reference rather than a value and is handled by the
/// evaluator; applied to a value it is simply `true`.
pub fn unary(operator: UnaryOperator, operand: &Value) -> Value {
    match operator {
        UnaryOperator::Plus => Value::Number(to_number(operand)),
        UnaryOperator::Minus => Value::Number(-to_number(operand)),
        UnaryOperator::Not => Value::Boolean(!to_boolean(operand)),
        UnaryOperator::BitwiseNot => int32(!to_int32(operand)),
        UnaryOperator::TypeOf => Value::from(operand.type_of()),
        UnaryOperator::Void => Value::Undefined,
        UnaryOperator::Delete => Value::Boolean(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::Number(n)
    }

    #[test]
    fn test_add_numbers() {
        assert_eq!(binary(BinaryOperator::Add, &num(1.0), &num(2.0)), num(3.0));
        assert_eq!(
            binary(BinaryOperator::Add, &Value::Boolean(true), &Value::Null),
            num(1.0)
        );
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(
            binary(BinaryOperator::Add, &Value::from("foo"), &num(1.0)),
            Value::from("foo1")
        );
        assert_eq!(
            binary(BinaryOperator::Add, &num(1.0), &Value::from("bar")),
            Value::from("1bar")
        );
        assert_eq!(
            binary(BinaryOperator::Add, &Value::Undefined, &Value::from("!")),
            Value::from("undefined!")
        );
        assert_eq!(
            binary(BinaryOperator::Add, &num(0.5), &Value::from("")),
            Value::from("0.5")
        );
    }

    #[test]
    fn test_arithmetic_coerces() {
        assert_eq!(
            binary(BinaryOperator::Subtract, &Value::from("10"), &num(4.0)),
            num(6.0)
        );
        assert_eq!(
            binary(BinaryOperator::Multiply, &Value::from("3"), &Value::from("4")),
            num(12.0)
        );
        assert!(
            binary(BinaryOperator::Multiply, &Value::Undefined, &num(1.0))
                .as_number()
                .is_some_and(f64::is_nan)
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            binary(BinaryOperator::Divide, &num(1.0), &num(0.0)),
            num(f64::INFINITY)
        );
        assert_eq!(
            binary(BinaryOperator::Divide, &num(-1.0), &num(0.0)),
            num(f64::NEG_INFINITY)
        );
        assert!(
            binary(BinaryOperator::Divide, &num(0.0), &num(0.0))
                .as_number()
                .is_some_and(f64::is_nan)
        );
    }

    #[test]
    fn test_modulus_keeps_dividend_sign() {
        assert_eq!(binary(BinaryOperator::Modulus, &num(-7.0), &num(3.0)), num(-1.0));
        assert_eq!(binary(BinaryOperator::Modulus, &num(7.5), &num(2.0)), num(1.5));
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(binary(BinaryOperator::BitwiseAnd, &num(6.0), &num(3.0)), num(2.0));
        assert_eq!(binary(BinaryOperator::BitwiseOr, &num(6.0), &num(3.0)), num(7.0));
        assert_eq!(binary(BinaryOperator::BitwiseXOr, &num(6.0), &num(3.0)), num(5.0));
        assert_eq!(
            binary(BinaryOperator::BitwiseOr, &num(4294967295.0), &num(0.0)),
            num(-1.0)
        );
    }

    #[test]
    fn test_shift_wraparound() {
        assert_eq!(
            binary(BinaryOperator::LeftShift, &num(f64::from(0xffff0000u32)), &num(8.0)),
            num(f64::from(0xff000000u32 as i32))
        );
        assert_eq!(binary(BinaryOperator::LeftShift, &num(1.0), &num(33.0)), num(2.0));
        assert_eq!(binary(BinaryOperator::LeftShift, &num(1.0), &num(31.0)), num(-2147483648.0));
        assert_eq!(
            binary(BinaryOperator::SignedRightShift, &num(-16.0), &num(2.0)),
            num(-4.0)
        );
        assert_eq!(
            binary(BinaryOperator::UnsignedRightShift, &num(-1.0), &num(0.0)),
            num(4294967295.0)
        );
        assert_eq!(
            binary(BinaryOperator::UnsignedRightShift, &num(-16.0), &num(28.0)),
            num(15.0)
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            binary(BinaryOperator::And, &num(0.0), &Value::from("x")),
            num(0.0)
        );
        assert_eq!(
            binary(BinaryOperator::Or, &num(0.0), &Value::from("x")),
            Value::from("x")
        );
    }

    #[test]
    fn test_equality_operators() {
        assert_eq!(
            binary(BinaryOperator::StrictlyEqual, &num(1.0), &num(1.0)),
            Value::Boolean(true)
        );
        assert_eq!(
            binary(BinaryOperator::NotEqual, &num(1.0), &Value::from("1")),
            Value::Boolean(true)
        );
        assert_eq!(
            binary(BinaryOperator::StrictlyNotEqual, &num(f64::NAN), &num(f64::NAN)),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(unary(UnaryOperator::Plus, &Value::from("0xff")), num(255.0));
        assert_eq!(unary(UnaryOperator::Minus, &Value::from("2")), num(-2.0));
        assert_eq!(unary(UnaryOperator::Not, &Value::from("")), Value::Boolean(true));
        assert_eq!(unary(UnaryOperator::BitwiseNot, &num(5.0)), num(-6.0));
        assert_eq!(unary(UnaryOperator::TypeOf, &num(5.0)), Value::from("number"));
        assert_eq!(unary(UnaryOperator::Void, &num(5.0)), Value::Undefined);
    }

    #[test]
    fn test_negation_produces_signed_zero() {
        let result = unary(UnaryOperator::Minus, &num(0.0));
        assert!(result.as_number().is_some_and(|n| n == 0.0 && n.is_sign_negative()));
    }
}
