//! BOOLEAN operators.
//!
//! Besides plain true/false checks these cover equality in general and the
//! different kinds of absence (undefined, null, either).

use crate::value::Value;

operator_enum! {
    /// Operators for booleans, equality and absence checks
    BooleanOperator {
        Equals => "EQUALS",
        NotEquals => "NOT-EQUALS",
        StrictEqual => "STRICT-EQUAL",
        StrictNotEqual => "STRICT-NOT-EQUAL",
        Is => "IS",
        IsNot => "IS-NOT",
        IsTruthy => "IS-TRUTHY",
        IsFalsy => "IS-FALSY",
        IsNil => "IS-NIL",
        IsNotNil => "IS-NOT-NIL",
        IsNull => "IS-NULL",
        IsNotNull => "IS-NOT-NULL",
        IsUndefined => "IS-UNDEFINED",
        IsDefined => "IS-DEFINED",
    }
}

/// Evaluate a BOOLEAN operator
pub fn evaluate(value: &Value, operator: BooleanOperator, match_value: &Value) -> bool {
    match operator {
        BooleanOperator::Equals => value == match_value,
        BooleanOperator::NotEquals => value != match_value,
        BooleanOperator::StrictEqual => value.strict_equals(match_value),
        BooleanOperator::StrictNotEqual => !value.strict_equals(match_value),
        BooleanOperator::Is => match (value.as_bool(), match_value.as_bool()) {
            (Some(actual), Some(expected)) => actual == expected,
            _ => false,
        },
        BooleanOperator::IsNot => match (value.as_bool(), match_value.as_bool()) {
            (Some(actual), Some(expected)) => actual != expected,
            _ => false,
        },
        BooleanOperator::IsTruthy => value.is_truthy(),
        BooleanOperator::IsFalsy => !value.is_truthy(),
        BooleanOperator::IsNil => value.is_nil(),
        BooleanOperator::IsNotNil => !value.is_nil(),
        BooleanOperator::IsNull => matches!(value, Value::Null),
        BooleanOperator::IsNotNull => !matches!(value, Value::Null),
        BooleanOperator::IsUndefined => value.is_undefined(),
        BooleanOperator::IsDefined => !value.is_undefined(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is() {
        let t = Value::Boolean(true);
        assert!(evaluate(&t, BooleanOperator::Is, &Value::Boolean(true)));
        assert!(!evaluate(&t, BooleanOperator::Is, &Value::Boolean(false)));
        assert!(evaluate(&t, BooleanOperator::IsNot, &Value::Boolean(false)));
        // A truthy non-boolean is not `true`
        assert!(!evaluate(&Value::Number(1.0), BooleanOperator::Is, &Value::Boolean(true)));
        assert!(!evaluate(&t, BooleanOperator::Is, &Value::from("true")));
    }

    #[test]
    fn test_equality_is_deep() {
        let a = Value::from(json!({"x": [1, 2]}));
        let b = Value::from(json!({"x": [1, 2]}));
        assert!(evaluate(&a, BooleanOperator::Equals, &b));
        assert!(!evaluate(&a, BooleanOperator::StrictEqual, &b));
        assert!(evaluate(&a, BooleanOperator::StrictNotEqual, &b));
        assert!(evaluate(&Value::from("x"), BooleanOperator::StrictEqual, &Value::from("x")));
        assert!(evaluate(&Value::Number(1.0), BooleanOperator::NotEquals, &Value::from("1")));
    }

    #[test]
    fn test_absence_kinds() {
        assert!(evaluate(&Value::Undefined, BooleanOperator::IsNil, &Value::Undefined));
        assert!(evaluate(&Value::Null, BooleanOperator::IsNil, &Value::Undefined));
        assert!(evaluate(&Value::Null, BooleanOperator::IsNull, &Value::Undefined));
        assert!(!evaluate(&Value::Undefined, BooleanOperator::IsNull, &Value::Undefined));
        assert!(evaluate(&Value::Undefined, BooleanOperator::IsUndefined, &Value::Undefined));
        assert!(!evaluate(&Value::Null, BooleanOperator::IsUndefined, &Value::Undefined));
        assert!(evaluate(&Value::Null, BooleanOperator::IsDefined, &Value::Undefined));
        assert!(evaluate(&Value::Boolean(false), BooleanOperator::IsNotNil, &Value::Undefined));
    }

    #[test]
    fn test_truthiness() {
        assert!(evaluate(&Value::from("yes"), BooleanOperator::IsTruthy, &Value::Undefined));
        assert!(evaluate(&Value::Number(0.0), BooleanOperator::IsFalsy, &Value::Undefined));
    }
}
