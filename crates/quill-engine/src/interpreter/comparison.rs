//! Equality and relational comparison.

use crate::ast::BinaryOperator;
use crate::runtime::conversions::to_number;
use crate::runtime::value::Value;
use std::cmp::Ordering;

/// Strict equality comparison (`===`).
///
/// Values of different types are unequal. NaN is unequal to everything,
/// `+0` equals `-0` and functions are equal only to themselves.
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    a == b
}

/// Equality comparison (`==`).
///
/// The language performs no cross-type coercion here, so this is the same
/// relation as [`strict_equals`]: `null == undefined` and `1 == "1"` are
/// both false.
pub fn abstract_equals(a: &Value, b: &Value) -> bool {
    strict_equals(a, b)
}

/// Orders two values for `<`, `>`, `<=` and `>=`.
///
/// Two strings compare by UTF-16 code units. Any other pair is compared
/// numerically after ToNumber; `None` means a NaN was involved.
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.encode_utf16().cmp(y.encode_utf16())),
        _ => to_number(a).partial_cmp(&to_number(b)),
    }
}

/// Evaluates a relational operator. Comparisons involving NaN are false.
pub fn relational(operator: BinaryOperator, a: &Value, b: &Value) -> bool {
    let Some(ordering) = compare(a, b) else {
        return false;
    };
    match operator {
        BinaryOperator::LessThan => ordering == Ordering::Less,
        BinaryOperator::GreaterThan => ordering == Ordering::Greater,
        BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equals_same_type() {
        assert!(strict_equals(&Value::Undefined, &Value::Undefined));
        assert!(strict_equals(&Value::Null, &Value::Null));
        assert!(strict_equals(&Value::Boolean(true), &Value::Boolean(true)));
        assert!(!strict_equals(&Value::Boolean(true), &Value::Boolean(false)));
        assert!(strict_equals(&Value::Number(42.0), &Value::Number(42.0)));
        assert!(strict_equals(&Value::from("foo"), &Value::from("foo")));
    }

    #[test]
    fn test_strict_equals_numbers() {
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
        assert!(strict_equals(&Value::Number(0.0), &Value::Number(-0.0)));
    }

    #[test]
    fn test_abstract_equals_does_not_coerce() {
        assert!(!abstract_equals(&Value::Null, &Value::Undefined));
        assert!(!abstract_equals(&Value::Number(1.0), &Value::from("1")));
        assert!(!abstract_equals(&Value::Boolean(true), &Value::Number(1.0)));
        assert!(abstract_equals(&Value::from("a"), &Value::from("a")));
    }

    #[test]
    fn test_compare_strings_lexicographically() {
        assert_eq!(compare(&Value::from("a"), &Value::from("b")), Some(Ordering::Less));
        assert_eq!(compare(&Value::from("10"), &Value::from("9")), Some(Ordering::Less));
        assert_eq!(compare(&Value::from("ab"), &Value::from("a")), Some(Ordering::Greater));
    }

    #[test]
    fn test_compare_uses_utf16_order() {
        // U+FF61 sorts after U+1F600 by code point but before it by code unit
        assert_eq!(
            compare(&Value::from("\u{1F600}"), &Value::from("\u{FF61}")),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_compare_mixed_types_numerically() {
        assert_eq!(compare(&Value::from("10"), &Value::Number(9.0)), Some(Ordering::Greater));
        assert_eq!(compare(&Value::Null, &Value::Number(0.0)), Some(Ordering::Equal));
        assert_eq!(compare(&Value::Undefined, &Value::Number(0.0)), None);
    }

    #[test]
    fn test_relational_with_nan_is_false() {
        let nan = Value::Number(f64::NAN);
        let one = Value::Number(1.0);
        for op in [
            BinaryOperator::LessThan,
            BinaryOperator::GreaterThan,
            BinaryOperator::LessThanOrEqual,
            BinaryOperator::GreaterThanOrEqual,
        ] {
            assert!(!relational(op, &nan, &one));
            assert!(!relational(op, &one, &nan));
        }
    }

    #[test]
    fn test_relational_operators() {
        let one = Value::Number(1.0);
        let two = Value::Number(2.0);
        assert!(relational(BinaryOperator::LessThan, &one, &two));
        assert!(!relational(BinaryOperator::GreaterThan, &one, &two));
        assert!(relational(BinaryOperator::LessThanOrEqual, &one, &one));
        assert!(relational(BinaryOperator::GreaterThanOrEqual, &two, &one));
    }
}
