//! MAP operators.

use super::{compare_size, object};
use crate::value::Value;
use std::collections::BTreeMap;

operator_enum! {
    MapOperator {
        Contains => "CONTAINS",
        HasKey => "HAS-KEY",
        HasValue => "HAS-VALUE",
        SizeEquals => "SIZE-EQUALS",
        SizeGreater => "SIZE-GREATER",
        SizeGreaterOrEquals => "SIZE-GREATER-OR-EQUALS" | "SIZE-GREATER-EQUALS",
        SizeLess => "SIZE-LESS",
        SizeLessOrEquals => "SIZE-LESS-OR-EQUALS" | "SIZE-LESS-EQUALS",
        IsEmpty => "IS-EMPTY",
        IsNotEmpty => "IS-NOT-EMPTY",
    }
}

/// Key/value entries of a map, or of an object seen as a map
fn entries(value: &Value) -> Option<Vec<(Value, &Value)>> {
    match value {
        Value::Map(entries) => Some(entries.iter().map(|(k, v)| (k.clone(), v)).collect()),
        Value::Object(fields) => Some(
            fields
                .iter()
                .map(|(k, v)| (Value::String(k.clone()), v))
                .collect(),
        ),
        _ => None,
    }
}

/// Convert a map into an object with stringified keys
fn to_record(value: &Value) -> Option<Value> {
    let fields: BTreeMap<String, Value> = entries(value)?
        .into_iter()
        .map(|(k, v)| (k.to_display_string(), v.clone()))
        .collect();
    Some(Value::Object(fields))
}

/// Evaluate a MAP operator
pub fn evaluate(value: &Value, operator: MapOperator, match_value: &Value) -> bool {
    let Some(entries) = entries(value) else {
        return false;
    };

    match operator {
        MapOperator::Contains => match (to_record(value), to_record(match_value)) {
            (Some(record), Some(pattern)) => object::contains(&record, &pattern),
            _ => false,
        },
        MapOperator::HasKey => entries.iter().any(|(k, _)| k == match_value),
        MapOperator::HasValue => entries.iter().any(|(_, v)| *v == match_value),
        MapOperator::SizeEquals => compare_size(entries.len(), match_value, |a, b| a == b),
        MapOperator::SizeGreater => compare_size(entries.len(), match_value, |a, b| a > b),
        MapOperator::SizeGreaterOrEquals => compare_size(entries.len(), match_value, |a, b| a >= b),
        MapOperator::SizeLess => compare_size(entries.len(), match_value, |a, b| a < b),
        MapOperator::SizeLessOrEquals => compare_size(entries.len(), match_value, |a, b| a <= b),
        MapOperator::IsEmpty => entries.is_empty(),
        MapOperator::IsNotEmpty => !entries.is_empty(),
    }
}
