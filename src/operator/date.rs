//! DATE operators.
//!
//! Operands are date-like strings (or native dates). Comparisons are made on
//! the parsed instant in UTC.

use crate::value::Value;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};

operator_enum! {
    /// Operators for points in time
    DateOperator {
        After => "AFTER",
        AfterOrEquals => "AFTER-OR-EQUALS",
        Before => "BEFORE",
        BeforeOrEquals => "BEFORE-OR-EQUALS",
        Between => "BETWEEN",
        NotBetween => "NOT-BETWEEN",
        Equals => "EQUALS",
        NotEquals => "NOT-EQUALS",
        IsWeekday => "IS-WEEKDAY",
        IsWeekend => "IS-WEEKEND",
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a date-like value into an instant.
///
/// Accepts RFC 3339 strings, zone-less date-times (taken as UTC) and plain
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let text = match value {
        Value::Date(d) => return Some(*d),
        Value::String(s) => s.trim(),
        _ => return None,
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(text, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Evaluate a DATE operator against the current time
pub fn evaluate(value: &Value, operator: DateOperator, match_value: &Value) -> bool {
    evaluate_at(value, operator, match_value, Utc::now())
}

/// Evaluate a DATE operator with an explicit "now".
///
/// `now` closes a BETWEEN window when only its lower bound is given.
pub fn evaluate_at(
    value: &Value,
    operator: DateOperator,
    match_value: &Value,
    now: DateTime<Utc>,
) -> bool {
    let Some(instant) = parse_date(value) else {
        return false;
    };

    match operator {
        DateOperator::IsWeekday => !is_weekend(instant.weekday()),
        DateOperator::IsWeekend => is_weekend(instant.weekday()),
        DateOperator::Between => match window(match_value, now) {
            Some((start, end)) => start <= instant && instant <= end,
            None => false,
        },
        DateOperator::NotBetween => match window(match_value, now) {
            Some((start, end)) => instant < start || end < instant,
            None => false,
        },
        _ => {
            let Some(target) = parse_date(match_value) else {
                return false;
            };
            match operator {
                DateOperator::After => instant > target,
                DateOperator::AfterOrEquals => instant >= target,
                DateOperator::Before => instant < target,
                DateOperator::BeforeOrEquals => instant <= target,
                DateOperator::Equals => instant == target,
                DateOperator::NotEquals => instant != target,
                _ => false,
            }
        }
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Resolve a BETWEEN window; a lone bound is paired with `now`
fn window(match_value: &Value, now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match match_value.as_array() {
        Some([start, end]) => Some((parse_date(start)?, parse_date(end)?)),
        Some([start]) => Some((parse_date(start)?, now)),
        Some(_) => None,
        None => Some((parse_date(match_value)?, now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn check(value: &str, operator: DateOperator, match_value: serde_json::Value) -> bool {
        evaluate_at(&Value::from(value), operator, &Value::from(match_value), now())
    }

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(parse_date(&Value::from("2024-01-02T03:04:05Z")), Some(expected));
        assert_eq!(parse_date(&Value::from("2024-01-02T05:04:05+02:00")), Some(expected));
        assert_eq!(parse_date(&Value::from("2024-01-02T03:04:05")), Some(expected));
        assert_eq!(parse_date(&Value::from("2024-01-02 03:04:05")), Some(expected));
        assert_eq!(
            parse_date(&Value::from("2024-01-02")),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date(&Value::from("yesterday")), None);
        assert_eq!(parse_date(&Value::Number(1_700_000_000.0)), None);
    }

    #[test]
    fn test_comparisons() {
        assert!(check("2024-03-01", DateOperator::After, json!("2024-02-01")));
        assert!(!check("2024-02-01", DateOperator::After, json!("2024-02-01")));
        assert!(check("2024-02-01", DateOperator::AfterOrEquals, json!("2024-02-01")));
        assert!(check("2024-01-01", DateOperator::Before, json!("2024-02-01")));
        assert!(check("2024-02-01", DateOperator::BeforeOrEquals, json!("2024-02-01T00:00:00Z")));
        assert!(check("2024-02-01", DateOperator::Equals, json!("2024-02-01T00:00:00Z")));
        assert!(check("2024-02-01", DateOperator::NotEquals, json!("2024-02-02")));
    }

    #[test]
    fn test_between_is_inclusive() {
        let window = json!(["2024-01-01", "2024-12-31"]);
        assert!(check("2024-01-01", DateOperator::Between, window.clone()));
        assert!(check("2024-12-31", DateOperator::Between, window.clone()));
        assert!(!check("2025-01-01", DateOperator::Between, window.clone()));
        assert!(check("2025-01-01", DateOperator::NotBetween, window));
    }

    #[test]
    fn test_between_single_bound_uses_now() {
        assert!(check("2024-06-01", DateOperator::Between, json!("2024-05-01")));
        assert!(!check("2024-07-01", DateOperator::Between, json!("2024-05-01")));
        assert!(check("2024-06-01", DateOperator::Between, json!(["2024-05-01"])));
    }

    #[test]
    fn test_weekday_weekend() {
        // 2024-06-15 is a Saturday
        assert!(check("2024-06-15", DateOperator::IsWeekend, json!(null)));
        assert!(check("2024-06-17", DateOperator::IsWeekday, json!(null)));
    }

    #[test]
    fn test_invalid_operands() {
        assert!(!check("not a date", DateOperator::Before, json!("2024-01-01")));
        assert!(!check("2024-01-01", DateOperator::NotEquals, json!(42)));
        assert!(!check("2024-01-01", DateOperator::NotBetween, json!([1, 2, 3])));
    }
}
