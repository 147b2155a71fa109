//! STRING operators.
//!
//! The value is turned into text before any operator runs: numbers, booleans,
//! dates and regexes use their display form, containers their JSON form.
//! Absent values (undefined or null) never match.

use crate::value::{Pattern, Value};

operator_enum! {
    StringOperator {
        Equals => "EQUALS",
        NotEquals => "NOT-EQUALS",
        Contains => "CONTAINS",
        NotContains => "NOT-CONTAINS",
        StartsWith => "STARTS-WITH",
        EndsWith => "ENDS-WITH",
        MatchesRegex => "MATCHES-REGEX",
        NotMatchesRegex => "NOT-MATCHES-REGEX",
        In => "IN",
        NotIn => "NOT-IN",
        IsEmpty => "IS-EMPTY",
        IsNotEmpty => "IS-NOT-EMPTY",
    }
}

fn coerce(value: &Value) -> Option<String> {
    if value.is_nil() {
        None
    } else {
        Some(value.to_display_string())
    }
}

/// A regex match value: either a compiled pattern or its source text
fn regex_of(match_value: &Value) -> Option<Pattern> {
    match match_value {
        Value::Regex(pattern) => Some(pattern.clone()),
        Value::String(source) => Pattern::new(source).ok(),
        _ => None,
    }
}

fn strings(match_value: &Value) -> Option<Vec<&str>> {
    match_value
        .as_array()?
        .iter()
        .map(Value::as_str)
        .collect::<Option<Vec<&str>>>()
}

/// Evaluate a STRING operator
pub fn evaluate(value: &Value, operator: StringOperator, match_value: &Value) -> bool {
    let Some(text) = coerce(value) else {
        return false;
    };
    let text = text.as_str();

    match operator {
        StringOperator::IsEmpty => text.is_empty(),
        StringOperator::IsNotEmpty => !text.is_empty(),
        StringOperator::MatchesRegex => regex_of(match_value).is_some_and(|re| re.is_match(text)),
        StringOperator::NotMatchesRegex => {
            regex_of(match_value).is_some_and(|re| !re.is_match(text))
        }
        StringOperator::In => strings(match_value).is_some_and(|list| list.contains(&text)),
        StringOperator::NotIn => strings(match_value).is_some_and(|list| !list.contains(&text)),
        _ => {
            let Some(needle) = match_value.as_str() else {
                return false;
            };
            match operator {
                StringOperator::Equals => text == needle,
                StringOperator::NotEquals => text != needle,
                StringOperator::Contains => text.contains(needle),
                StringOperator::NotContains => !text.contains(needle),
                StringOperator::StartsWith => text.starts_with(needle),
                StringOperator::EndsWith => text.ends_with(needle),
                _ => false,
            }
        }
    }
}
