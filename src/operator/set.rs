//! SET operators. Everything except membership delegates to ARRAY.

use super::array::{self, ArrayOperator};
use crate::value::Value;

operator_enum! {
    /// Operators for unordered collections of distinct values
    SetOperator {
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
        Has => "HAS",
        NotHas => "NOT-HAS",
    }
}

impl SetOperator {
    /// The ARRAY operator this one delegates to, if any
    fn as_array_operator(&self) -> Option<ArrayOperator> {
        match self {
            SetOperator::ExactlyMatches => Some(ArrayOperator::ExactlyMatches),
            SetOperator::IncludesAll => Some(ArrayOperator::IncludesAll),
            SetOperator::IncludesAny => Some(ArrayOperator::IncludesAny),
            SetOperator::NotIncludesAll => Some(ArrayOperator::NotIncludesAll),
            SetOperator::NotIncludesAny => Some(ArrayOperator::NotIncludesAny),
            SetOperator::SizeEquals => Some(ArrayOperator::SizeEquals),
            SetOperator::SizeGreater => Some(ArrayOperator::SizeGreater),
            SetOperator::SizeGreaterOrEquals => Some(ArrayOperator::SizeGreaterOrEquals),
            SetOperator::SizeLess => Some(ArrayOperator::SizeLess),
            SetOperator::SizeLessOrEquals => Some(ArrayOperator::SizeLessOrEquals),
            SetOperator::IsEmpty => Some(ArrayOperator::IsEmpty),
            SetOperator::IsNotEmpty => Some(ArrayOperator::IsNotEmpty),
            SetOperator::Has | SetOperator::NotHas => None,
        }
    }
}

/// Evaluate a SET operator.
///
/// Sets are the native shape; arrays are accepted too since JSON records
/// have no set type.
pub fn evaluate(value: &Value, operator: SetOperator, match_value: &Value) -> bool {
    let Some(items) = value.as_sequence() else {
        return false;
    };
    match operator {
        SetOperator::Has => items.contains(match_value),
        SetOperator::NotHas => !items.contains(match_value),
        other => match other.as_array_operator() {
            Some(array_op) => array::evaluate_sequence(items, array_op, match_value),
            None => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Value {
        Value::set(items.iter().map(|s| Value::from(*s)))
    }

    #[test]
    fn test_membership() {
        let roles = set(&["admin", "editor"]);
        assert!(evaluate(&roles, SetOperator::Has, &Value::from("admin")));
        assert!(!evaluate(&roles, SetOperator::Has, &Value::from("viewer")));
        assert!(evaluate(&roles, SetOperator::NotHas, &Value::from("viewer")));
    }

    #[test]
    fn test_delegated_operators() {
        let roles = set(&["admin", "editor"]);
        assert!(evaluate(&roles, SetOperator::ExactlyMatches, &set(&["editor", "admin"])));
        assert!(evaluate(&roles, SetOperator::IncludesAny, &set(&["viewer", "admin"])));
        assert!(evaluate(&roles, SetOperator::SizeEquals, &Value::Number(2.0)));
        assert!(evaluate(&Value::set(vec![]), SetOperator::IsEmpty, &Value::Undefined));
    }

    #[test]
    fn test_arrays_are_accepted() {
        let roles = Value::from(vec!["a", "b"]);
        assert!(evaluate(&roles, SetOperator::Has, &Value::from("b")));
        assert!(!evaluate(&Value::from("a"), SetOperator::Has, &Value::from("a")));
    }
}
