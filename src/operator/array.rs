//! ARRAY operators.

use super::compare_size;
use crate::value::{sorted, Value};

operator_enum! {
    /// Operators for ordered sequences
    ArrayOperator {
        ExactlyMatches => "EXACTLY-MATCHES",
        IncludesAll => "INCLUDES-ALL",
        IncludesAny => "INCLUDES-ANY",
        NotIncludesAll => "NOT-INCLUDES-ALL",
        NotIncludesAny => "NOT-INCLUDES-ANY",
        SizeEquals => "SIZE-EQUALS",
        SizeGreater => "SIZE-GREATER",
        SizeGreaterOrEquals => "SIZE-GREATER-OR-EQUALS" | "SIZE-GREATER-EQUALS",
        SizeLess => "SIZE-LESS",
        SizeLessOrEquals => "SIZE-LESS-OR-EQUALS" | "SIZE-LESS-EQUALS",
        IsEmpty => "IS-EMPTY",
        IsNotEmpty => "IS-NOT-EMPTY",
    }
}

/// Evaluate an ARRAY operator; the value must be an array
pub fn evaluate(value: &Value, operator: ArrayOperator, match_value: &Value) -> bool {
    match value.as_array() {
        Some(items) => evaluate_sequence(items, operator, match_value),
        None => false,
    }
}

/// Evaluate an ARRAY operator over any sequence of values
pub(crate) fn evaluate_sequence(items: &[Value], operator: ArrayOperator, match_value: &Value) -> bool {
    match operator {
        ArrayOperator::ExactlyMatches => match match_value.as_sequence() {
            Some(expected) => {
                items.len() == expected.len() && sorted(items) == sorted(expected)
            }
            None => false,
        },
        ArrayOperator::IncludesAll => match match_value.as_sequence() {
            Some(expected) => includes_all(items, expected),
            None => false,
        },
        ArrayOperator::IncludesAny => match match_value.as_sequence() {
            Some(expected) => includes_any(items, expected),
            None => false,
        },
        ArrayOperator::NotIncludesAll => match match_value.as_sequence() {
            Some(expected) => !includes_all(items, expected),
            None => false,
        },
        ArrayOperator::NotIncludesAny => match match_value.as_sequence() {
            Some(expected) => !includes_any(items, expected),
            None => false,
        },
        ArrayOperator::SizeEquals => compare_size(items.len(), match_value, |a, b| a == b),
        ArrayOperator::SizeGreater => compare_size(items.len(), match_value, |a, b| a > b),
        ArrayOperator::SizeGreaterOrEquals => {
            compare_size(items.len(), match_value, |a, b| a >= b)
        }
        ArrayOperator::SizeLess => compare_size(items.len(), match_value, |a, b| a < b),
        ArrayOperator::SizeLessOrEquals => compare_size(items.len(), match_value, |a, b| a <= b),
        ArrayOperator::IsEmpty => items.is_empty(),
        ArrayOperator::IsNotEmpty => !items.is_empty(),
    }
}

fn includes_all(items: &[Value], expected: &[Value]) -> bool {
    expected.iter().all(|wanted| items.contains(wanted))
}

fn includes_any(items: &[Value], expected: &[Value]) -> bool {
    expected.iter().any(|wanted| items.contains(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_exactly_matches_ignores_order() {
        let tags = v(json!(["developer", "javascript"]));
        assert!(evaluate(
            &tags,
            ArrayOperator::ExactlyMatches,
            &v(json!(["javascript", "developer"]))
        ));
        assert!(!evaluate(
            &tags,
            ArrayOperator::ExactlyMatches,
            &v(json!(["developer"]))
        ));
        // Multisets: duplicates count
        assert!(!evaluate(
            &v(json!(["a", "a", "b"])),
            ArrayOperator::ExactlyMatches,
            &v(json!(["a", "b", "b"]))
        ));
        // Maps sharing keys are told apart by their values
        let map = |n: f64| Value::map([(Value::from("a"), Value::Number(n))]);
        assert!(evaluate(
            &Value::Array(vec![map(1.0), map(2.0)]),
            ArrayOperator::ExactlyMatches,
            &Value::Array(vec![map(2.0), map(1.0)])
        ));
        assert!(!evaluate(
            &Value::Array(vec![map(1.0), map(1.0)]),
            ArrayOperator::ExactlyMatches,
            &Value::Array(vec![map(1.0), map(2.0)])
        ));
    }

    #[test]
    fn test_includes() {
        let tags = v(json!(["a", {"k": 1}, 3]));
        assert!(evaluate(&tags, ArrayOperator::IncludesAll, &v(json!([{"k": 1}, 3]))));
        assert!(!evaluate(&tags, ArrayOperator::IncludesAll, &v(json!(["a", "z"]))));
        assert!(evaluate(&tags, ArrayOperator::IncludesAny, &v(json!(["z", "a"]))));
        assert!(evaluate(&tags, ArrayOperator::NotIncludesAll, &v(json!(["a", "z"]))));
        assert!(evaluate(&tags, ArrayOperator::NotIncludesAny, &v(json!(["y", "z"]))));
        assert!(!evaluate(&tags, ArrayOperator::NotIncludesAny, &v(json!(["a"]))));
    }

    #[test]
    fn test_size_operators() {
        let items = v(json!([1, 2, 3]));
        assert!(evaluate(&items, ArrayOperator::SizeEquals, &Value::Number(3.0)));
        assert!(evaluate(&items, ArrayOperator::SizeGreater, &Value::Number(2.0)));
        assert!(evaluate(&items, ArrayOperator::SizeGreaterOrEquals, &Value::Number(3.0)));
        assert!(evaluate(&items, ArrayOperator::SizeLess, &Value::Number(4.0)));
        assert!(!evaluate(&items, ArrayOperator::SizeLessOrEquals, &Value::Number(2.0)));
        assert!(!evaluate(&items, ArrayOperator::SizeEquals, &Value::from("3")));
    }

    #[test]
    fn test_emptiness() {
        assert!(evaluate(&v(json!([])), ArrayOperator::IsEmpty, &Value::Undefined));
        assert!(evaluate(&v(json!([0])), ArrayOperator::IsNotEmpty, &Value::Undefined));
    }

    #[test]
    fn test_invalid_shapes_are_false() {
        assert!(!evaluate(&v(json!("abc")), ArrayOperator::IsEmpty, &Value::Undefined));
        assert!(!evaluate(&Value::Undefined, ArrayOperator::NotIncludesAny, &v(json!(["a"]))));
        assert!(!evaluate(&v(json!(["a"])), ArrayOperator::NotIncludesAny, &v(json!("a"))));
    }
}
