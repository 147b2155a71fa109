//! OBJECT operators.

use crate::value::Value;

operator_enum! {
    ObjectOperator {
        Contains => "CONTAINS",
        NotContains => "NOT-CONTAINS",
        Equals => "EQUALS",
        NotEquals => "NOT-EQUALS",
        HasKey => "HAS-KEY",
        NotHasKey => "NOT-HAS-KEY",
        HasValue => "HAS-VALUE",
        NotHasValue => "NOT-HAS-VALUE",
        IsEmpty => "IS-EMPTY",
        IsNotEmpty => "IS-NOT-EMPTY",
    }
}

/// Evaluate an OBJECT operator; the value must be an object
pub fn evaluate(value: &Value, operator: ObjectOperator, match_value: &Value) -> bool {
    let Some(fields) = value.as_object() else {
        return false;
    };

    match operator {
        ObjectOperator::Contains => match_value.as_object().is_some() && contains(value, match_value),
        ObjectOperator::NotContains => {
            match_value.as_object().is_some() && !contains(value, match_value)
        }
        ObjectOperator::Equals => match_value.as_object().is_some() && value == match_value,
        ObjectOperator::NotEquals => match_value.as_object().is_some() && value != match_value,
        ObjectOperator::HasKey => match_value.as_str().is_some_and(|k| fields.contains_key(k)),
        ObjectOperator::NotHasKey => match_value.as_str().is_some_and(|k| !fields.contains_key(k)),
        ObjectOperator::HasValue => fields.values().any(|v| v == match_value),
        ObjectOperator::NotHasValue => !fields.values().any(|v| v == match_value),
        ObjectOperator::IsEmpty => fields.is_empty(),
        ObjectOperator::IsNotEmpty => !fields.is_empty(),
    }
}

/// Recursive sub-structure match.
///
/// Every key of an object pattern must exist on the value with a matching
/// entry; every item of an array pattern must match some item of the value's
/// array. Anything else compares by deep equality.
pub fn contains(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (Value::Object(fields), Value::Object(wanted)) => wanted.iter().all(|(key, sub)| {
            fields
                .get(key)
                .is_some_and(|actual| contains(actual, sub))
        }),
        (Value::Array(items), Value::Array(wanted)) => wanted
            .iter()
            .all(|sub| items.iter().any(|item| contains(item, sub))),
        (_, Value::Object(_)) | (_, Value::Array(_)) => false,
        _ => value == pattern,
    }
}
