//! Type conversions between runtime values.
//!
//! These follow the ECMAScript abstract operations ToNumber, ToString,
//! ToBoolean, ToInt32 and ToUint32 for the value types the language has.

use super::value::Value;

const TWO_32: f64 = 4_294_967_296.0;
const TWO_31: f64 = 2_147_483_648.0;

/// Converts a value to a number (ToNumber).
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Boolean(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        Value::Function(_) => f64::NAN,
    }
}

/// Parses a string the way ToNumber does.
///
/// Surrounding whitespace is ignored and an empty string is 0. The rest must
/// be a signed decimal literal, a `0x` hex literal or a signed `Infinity`.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        return parse_hex(hex).unwrap_or(f64::NAN);
    }

    let (sign, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (-1.0, &trimmed[1..]),
        b'+' => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    if unsigned == "Infinity" {
        return sign * f64::INFINITY;
    }

    if !is_decimal_literal(unsigned) {
        return f64::NAN;
    }

    unsigned
        .parse::<f64>()
        .map(|n| sign * n)
        .unwrap_or(f64::NAN)
}

fn parse_hex(digits: &str) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(16).map(|digit| acc * 16.0 + f64::from(digit))
    })
}

/// Matches `digits[.digits][e[+-]digits]` or `.digits[e[+-]digits]`.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let integer = count_digits(i);
    i += integer;

    let mut fraction = 0;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        fraction = count_digits(i);
        i += fraction;
    }

    if integer == 0 && fraction == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exponent = count_digits(i);
        if exponent == 0 {
            return false;
        }
        i += exponent;
    }

    i == bytes.len()
}

/// Converts a value to a string (ToString).
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
        Value::Function(function) => match &function.name {
            Some(name) => format!("function {}() {{ [code] }}", name),
            None => "function () { [code] }".to_string(),
        },
    }
}

/// Formats a number like `Number.prototype.toString()` with radix 10.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n < 0.0 {
        return format!("-{}", number_to_string(-n));
    }

    // Shortest round-trip digits, e.g. "1.2345e3"
    let exponential = format!("{:e}", n);
    let (mantissa, exponent) = exponential
        .split_once('e')
        .unwrap_or((exponential.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    // Position of the decimal point relative to the first digit
    let k = digits.len() as i32;
    let point = exponent + 1;

    if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{}.{}", whole, fraction)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let sign = if point - 1 < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, (point - 1).abs())
        } else {
            format!("{}.{}e{}{}", first, rest, sign, (point - 1).abs())
        }
    }
}

/// Converts a value to a boolean (ToBoolean).
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => !n.is_nan() && *n != 0.0,
        Value::String(s) => !s.is_empty(),
        Value::Function(_) => true,
    }
}

/// Reduces a number to its integer part modulo 2^32.
fn modulo_32(n: f64) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return 0.0;
    }
    n.trunc().rem_euclid(TWO_32)
}

/// Converts a value to a signed 32-bit integer (ToInt32).
pub fn to_int32(value: &Value) -> i32 {
    number_to_int32(to_number(value))
}

/// Converts a value to an unsigned 32-bit integer (ToUint32).
pub fn to_uint32(value: &Value) -> u32 {
    number_to_uint32(to_number(value))
}

/// ToInt32 applied to a number.
pub fn number_to_int32(n: f64) -> i32 {
    let m = modulo_32(n);
    if m >= TWO_31 {
        (m - TWO_32) as i32
    } else {
        m as i32
    }
}

/// ToUint32 applied to a number.
pub fn number_to_uint32(n: f64) -> u32 {
    modulo_32(n) as u32
}

/// Shift amount for `<<`, `>>` and `>>>`: the low five bits of ToUint32.
pub fn shift_count(value: &Value) -> u32 {
    to_uint32(value) & 0x1f
}
