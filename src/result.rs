//! Evaluation results.
//!
//! Results mirror the shape of the evaluated expression and carry a
//! human-readable reason at every level. They serialize to camelCase JSON.

use crate::expression::LogicalOperator;
use crate::value::Value;
use serde::Serialize;

/// Outcome of one criterion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaResult {
    /// Display form of the effective match value
    pub match_value: String,
    pub passed: bool,
    pub reason: String,
    /// The value the operator was applied to
    pub value: Value,
}

/// Outcome of a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub operator: LogicalOperator,
    pub passed: bool,
    pub reason: String,
    /// One entry per criterion that was evaluated, in declaration order
    pub results: Vec<CriteriaResult>,
}

/// Outcome of a filter group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterGroupResult {
    pub operator: LogicalOperator,
    pub passed: bool,
    pub reason: String,
    pub results: Vec<FilterResult>,
}

/// Result at the level of the evaluated expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchResult {
    Criteria(CriteriaResult),
    Filter(FilterResult),
    FilterGroup(FilterGroupResult),
}

impl MatchResult {
    pub fn passed(&self) -> bool {
        match self {
            MatchResult::Criteria(r) => r.passed,
            MatchResult::Filter(r) => r.passed,
            MatchResult::FilterGroup(r) => r.passed,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            MatchResult::Criteria(r) => &r.reason,
            MatchResult::Filter(r) => &r.reason,
            MatchResult::FilterGroup(r) => &r.reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization() -> anyhow::Result<()> {
        let result = MatchResult::Filter(FilterResult {
            operator: LogicalOperator::Or,
            passed: true,
            reason: "ok".to_string(),
            results: vec![CriteriaResult {
                match_value: "30".to_string(),
                passed: true,
                reason: "NUMBER \"LESS\" passed".to_string(),
                value: Value::Number(25.0),
            }],
        });
        assert!(result.passed());
        assert_eq!(result.reason(), "ok");

        let json = serde_json::to_value(&result)?;
        assert_eq!(
            json,
            json!({
                "operator": "OR",
                "passed": true,
                "reason": "ok",
                "results": [{
                    "matchValue": "30",
                    "passed": true,
                    "reason": "NUMBER \"LESS\" passed",
                    "value": 25
                }]
            })
        );
        Ok(())
    }
}
