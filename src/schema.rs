//! JSON form of expressions.
//!
//! The level of a node is decided by its keys: `filters` makes a group,
//! `criteria` makes a filter, anything else is a criterion. A criterion with
//! an `alias` but no `type` or no `operator` refers to a saved criterion;
//! every other field it carries becomes an override.
//!
//! ```json
//! {
//!   "operator": "OR",
//!   "filters": [
//!     { "criteria": [
//!       { "type": "NUMBER", "operator": "LESS", "valuePath": "age", "matchValue": 30 },
//!       { "alias": "adults" }
//!     ] }
//!   ]
//! }
//! ```

use crate::criteria::{AliasRef, Criterion, CriterionKind, CriterionNode, MatchValue};
use crate::error::{FilterError, Result};
use crate::expression::{Expression, Filter, FilterGroup, LogicalOperator};
use crate::operator::CriterionType;
use crate::path::parse_path;
use crate::value::Value;
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawGroup {
    operator: Option<String>,
    filters: Vec<Json>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawFilter {
    operator: Option<String>,
    criteria: Vec<Json>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawCriterion {
    #[serde(rename = "type")]
    criterion_type: Option<String>,
    operator: Option<String>,
    match_value: Option<Json>,
    value_path: Option<RawPath>,
    default_value: Option<Json>,
    normalize: Option<bool>,
    match_in_array: Option<bool>,
    heavy: Option<bool>,
    alias: Option<String>,
}

/// A path given either as segments or as a dotted string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPath {
    Segments(Vec<String>),
    Dotted(String),
}

impl RawPath {
    fn into_segments(self) -> Vec<String> {
        match self {
            RawPath::Segments(segments) => segments,
            RawPath::Dotted(dotted) => parse_path(&dotted),
        }
    }
}

/// Parse an expression at any level
pub fn parse_expression(raw: &Json) -> Result<Expression> {
    let Some(fields) = raw.as_object() else {
        return Err(FilterError::validation("$", "expression must be an object"));
    };
    if fields.contains_key("filters") {
        parse_group(raw, "$").map(Expression::FilterGroup)
    } else if fields.contains_key("criteria") {
        parse_filter(raw, "$").map(Expression::Filter)
    } else {
        parse_node(raw, "$").map(Expression::Criterion)
    }
}

/// Parse a complete criterion definition, as saved under an alias
pub fn parse_criterion(raw: &Json) -> Result<Criterion> {
    match parse_node(raw, "$")? {
        CriterionNode::Criterion(criterion) => Ok(*criterion),
        CriterionNode::Alias(reference) => Err(FilterError::validation(
            "$",
            format!(
                "'{}' is an alias reference, a full definition needs type and operator",
                reference.alias
            ),
        )),
    }
}

fn deserialize<T: serde::de::DeserializeOwned>(raw: &Json, path: &str) -> Result<T> {
    T::deserialize(raw).map_err(|e| FilterError::validation(path, e.to_string()))
}

fn logical_operator(name: Option<&str>, path: &str) -> Result<LogicalOperator> {
    match name {
        None => Ok(LogicalOperator::And),
        Some(name) => LogicalOperator::parse(name).ok_or_else(|| {
            FilterError::validation(path, format!("operator must be AND or OR, got '{}'", name))
        }),
    }
}

fn parse_group(raw: &Json, path: &str) -> Result<FilterGroup> {
    let group: RawGroup = deserialize(raw, path)?;
    let operator = logical_operator(group.operator.as_deref(), path)?;
    let filters = group
        .filters
        .iter()
        .enumerate()
        .map(|(i, filter)| parse_filter(filter, &format!("{}.filters[{}]", path, i)))
        .collect::<Result<Vec<_>>>()?;
    Ok(FilterGroup::new(operator, filters))
}

fn parse_filter(raw: &Json, path: &str) -> Result<Filter> {
    let filter: RawFilter = deserialize(raw, path)?;
    let operator = logical_operator(filter.operator.as_deref(), path)?;
    let criteria = filter
        .criteria
        .iter()
        .enumerate()
        .map(|(i, node)| parse_node(node, &format!("{}.criteria[{}]", path, i)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Filter::new(operator, criteria))
}

fn parse_node(raw: &Json, path: &str) -> Result<CriterionNode> {
    let raw: RawCriterion = deserialize(raw, path)?;

    let criterion_type = raw
        .criterion_type
        .as_deref()
        .map(|name| {
            CriterionType::parse(name)
                .ok_or_else(|| FilterError::validation(path, format!("unknown type '{}'", name)))
        })
        .transpose()?;

    if criterion_type == Some(CriterionType::Custom) {
        return Err(FilterError::validation(
            path,
            "CUSTOM criteria need a predicate and cannot be declared in JSON",
        ));
    }

    let match_value = raw.match_value.as_ref().map(parse_match_value);

    match (raw.alias, criterion_type, raw.operator) {
        (Some(alias), criterion_type, operator)
            if criterion_type.is_none() || operator.is_none() =>
        {
            if raw.heavy.is_some() || raw.default_value.is_some() {
                return Err(FilterError::validation(
                    path,
                    "alias references cannot override heavy or defaultValue",
                ));
            }
            Ok(CriterionNode::Alias(AliasRef {
                alias,
                criterion_type,
                operator,
                match_value,
                value_path: raw.value_path.map(RawPath::into_segments),
                normalize: raw.normalize,
                match_in_array: raw.match_in_array,
                criteria_mapper: None,
                value_mapper: None,
            }))
        }
        (alias, Some(criterion_type), Some(operator)) => {
            let kind = CriterionKind::parse(criterion_type, &operator)?;
            let mut criterion = Criterion::new(kind, Value::Undefined);
            criterion.match_value = match_value.unwrap_or_default();
            if let Some(value_path) = raw.value_path {
                criterion.value_path = value_path.into_segments();
            }
            if let Some(default_value) = &raw.default_value {
                criterion.default_value = Value::from(default_value.clone());
            }
            if let Some(normalize) = raw.normalize {
                criterion.normalize = normalize;
            }
            if let Some(match_in_array) = raw.match_in_array {
                criterion.match_in_array = match_in_array;
            }
            criterion.heavy = raw.heavy.unwrap_or(false);
            criterion.alias = alias;
            Ok(criterion.into())
        }
        (None, None, _) => Err(FilterError::validation(path, "missing type")),
        (None, Some(_), None) => Err(FilterError::validation(path, "missing operator")),
        // Covered by the guarded alias arm
        (Some(_), _, _) => Err(FilterError::validation(path, "incomplete alias reference")),
    }
}

/// `{"$path": "a.b"}` or `{"$path": ["a", "b"]}` reads from the record
fn parse_match_value(raw: &Json) -> MatchValue {
    if let Some(fields) = raw.as_object() {
        if fields.len() == 1 {
            match fields.get("$path") {
                Some(Json::String(dotted)) => return MatchValue::path(dotted),
                Some(Json::Array(segments)) if segments.iter().all(Json::is_string) => {
                    return MatchValue::Path(
                        segments
                            .iter()
                            .filter_map(|s| s.as_str().map(str::to_string))
                            .collect(),
                    )
                }
                _ => {}
            }
        }
    }
    MatchValue::Literal(Value::from(raw.clone()))
}
