//! Lenient coercion helpers shared by the normalizer, the legacy adapter and
//! the entry form.

use serde_json::Value;

/// 2^64, the first float that no longer fits in a `u64`.
const U64_CEILING: f64 = 18_446_744_073_709_551_616.0;

/// Removes every character that is not an ASCII digit.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Coerces a loosely typed value into a non-negative integer.
///
/// Numbers are truncated toward zero and floored at 0. Strings have every
/// non-digit stripped before parsing. Values too large for `u64` are rejected
/// rather than saturated, whether they arrive as a float or as a digit string:
/// both yield 0, as do other JSON shapes and empty digit strings.
pub fn to_non_negative_int(value: &Value) -> u64 {
    match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                unsigned
            } else if number.is_i64() {
                0
            } else {
                match number.as_f64() {
                    Some(float) if float > 0.0 && float < U64_CEILING => {
                        float.trunc() as u64
                    }
                    _ => 0,
                }
            }
        }
        Value::String(text) => parse_digits(text),
        _ => 0,
    }
}

/// Same as [`to_non_negative_int`] for raw text input.
pub fn str_to_non_negative_int(text: &str) -> u64 {
    parse_digits(text)
}

fn parse_digits(text: &str) -> u64 {
    let cleaned = digits_only(text);
    if cleaned.is_empty() {
        return 0;
    }
    cleaned.parse().unwrap_or(0)
}

/// Coerces `value` and keeps it only when it lies in `min..=max`.
pub fn to_int_in_range(value: &Value, min: u64, max: u64) -> Option<u64> {
    let parsed = to_non_negative_int(value);
    (min..=max).contains(&parsed).then_some(parsed)
}

pub fn str_to_int_in_range(text: &str, min: u64, max: u64) -> Option<u64> {
    let parsed = str_to_non_negative_int(text);
    (min..=max).contains(&parsed).then_some(parsed)
}

/// Renders `n` with at least two digits, e.g. `7` as `"07"`.
pub fn zero_pad2(n: u64) -> String {
    format!("{n:02}")
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use serde_json::json;

    #[test]
    fn digits_only__strips_everything_but_digits() {
        assert_eq!(digits_only("a1-2 b3"), "123");
        assert_eq!(digits_only("no digits"), "");
        assert_eq!(digits_only("๑23"), "23");
    }

    #[test]
    fn to_non_negative_int__truncates_and_floors_numbers() {
        assert_eq!(to_non_negative_int(&json!(42)), 42);
        assert_eq!(to_non_negative_int(&json!(12.9)), 12);
        assert_eq!(to_non_negative_int(&json!(-5)), 0);
        assert_eq!(to_non_negative_int(&json!(-0.5)), 0);
    }

    #[test]
    fn to_non_negative_int__strips_non_digits_from_strings() {
        assert_eq!(to_non_negative_int(&json!("1,000")), 1000);
        assert_eq!(to_non_negative_int(&json!("-5")), 5);
        assert_eq!(to_non_negative_int(&json!("")), 0);
        assert_eq!(to_non_negative_int(&json!("abc")), 0);
    }

    #[test]
    fn to_non_negative_int__other_shapes_yield_zero() {
        assert_eq!(to_non_negative_int(&Value::Null), 0);
        assert_eq!(to_non_negative_int(&json!(true)), 0);
        assert_eq!(to_non_negative_int(&json!({"a": 1})), 0);
    }

    #[test]
    fn to_non_negative_int__overflowing_digit_string_yields_zero() {
        assert_eq!(to_non_negative_int(&json!("99999999999999999999999")), 0);
    }

    #[test]
    fn to_non_negative_int__oversized_float_and_string_both_yield_zero() {
        assert_eq!(to_non_negative_int(&json!(1e20)), 0);
        assert_eq!(to_non_negative_int(&json!("100000000000000000000")), 0);
        assert_eq!(to_non_negative_int(&json!(1.8e19)), 18_000_000_000_000_000_000);
    }

    #[test]
    fn to_int_in_range__accepts_bounds_inclusive() {
        assert_eq!(to_int_in_range(&json!("00"), 0, 99), Some(0));
        assert_eq!(to_int_in_range(&json!(99), 0, 99), Some(99));
        assert_eq!(to_int_in_range(&json!("100"), 0, 99), None);
        assert_eq!(str_to_int_in_range("55", 0, 49), None);
        assert_eq!(str_to_int_in_range("49", 0, 49), Some(49));
    }

    #[test]
    fn zero_pad2__pads_single_digits_only() {
        assert_eq!(zero_pad2(7), "07");
        assert_eq!(zero_pad2(50), "50");
        assert_eq!(zero_pad2(0), "00");
    }
}
