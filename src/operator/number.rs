//! NUMBER operators.

use crate::value::Value;

operator_enum! {
    NumberOperator {
        Equals => "EQUALS",
        NotEquals => "NOT-EQUALS",
        Greater => "GREATER",
        GreaterOrEquals => "GREATER-OR-EQUALS" | "GREATER-EQUALS",
        Less => "LESS",
        LessOrEquals => "LESS-OR-EQUALS" | "LESS-EQUALS",
        Between => "BETWEEN",
        NotBetween => "NOT-BETWEEN",
        In => "IN",
        NotIn => "NOT-IN",
    }
}

/// Evaluate a NUMBER operator
pub fn evaluate(value: &Value, operator: NumberOperator, match_value: &Value) -> bool {
    let Some(n) = value.as_f64() else {
        return false;
    };

    match operator {
        NumberOperator::Between => bounds(match_value).is_some_and(|(lo, hi)| lo <= n && n <= hi),
        NumberOperator::NotBetween => bounds(match_value).is_some_and(|(lo, hi)| n < lo || hi < n),
        NumberOperator::In => numbers(match_value).is_some_and(|list| list.contains(&n)),
        NumberOperator::NotIn => numbers(match_value).is_some_and(|list| !list.contains(&n)),
        _ => {
            let Some(target) = match_value.as_f64() else {
                return false;
            };
            match operator {
                NumberOperator::Equals => n == target,
                NumberOperator::NotEquals => n != target,
                NumberOperator::Greater => n > target,
                NumberOperator::GreaterOrEquals => n >= target,
                NumberOperator::Less => n < target,
                NumberOperator::LessOrEquals => n <= target,
                _ => false,
            }
        }
    }
}

/// A match value that is a sequence made only of numbers
fn numbers(match_value: &Value) -> Option<Vec<f64>> {
    match_value
        .as_array()?
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<f64>>>()
}

/// `[low, high]`, both numbers
fn bounds(match_value: &Value) -> Option<(f64, f64)> {
    match numbers(match_value)?.as_slice() {
        [lo, hi] => Some((*lo, *hi)),
        _ => None,
    }
}
