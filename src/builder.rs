//! Builder pattern for creating filter expressions easily.
//!
//! Paths are dotted strings (`"user.address.city"`); every criterion gets
//! the defaults of its type and can be tuned further with the builder
//! methods on [`Criterion`].

use crate::criteria::{AliasRef, Criterion, CustomPredicate};
use crate::expression::{Filter, FilterGroup};
use crate::operator::{
    ArrayOperator, BooleanOperator, DateOperator, GeoOperator, MapOperator, NumberOperator,
    ObjectOperator, SetOperator, StringOperator,
};
use crate::value::Value;

/// Builder for creating criteria, filters and groups
pub struct FilterBuilder;

impl FilterBuilder {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self
    }

    /// Create an ARRAY criterion
    pub fn array(path: &str, op: ArrayOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a BOOLEAN criterion
    pub fn boolean(path: &str, op: BooleanOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a DATE criterion
    pub fn date(path: &str, op: DateOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a GEO criterion
    pub fn geo(path: &str, op: GeoOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a MAP criterion
    pub fn map(path: &str, op: MapOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a NUMBER criterion
    pub fn number(path: &str, op: NumberOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create an OBJECT criterion
    pub fn object(path: &str, op: ObjectOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a SET criterion
    pub fn set(path: &str, op: SetOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a STRING criterion
    pub fn string(path: &str, op: StringOperator, value: impl Into<Value>) -> Criterion {
        Criterion::new(op, value).path(path)
    }

    /// Create a CUSTOM criterion
    pub fn custom(predicate: CustomPredicate, value: impl Into<Value>) -> Criterion {
        Criterion::custom(predicate, value)
    }

    /// Reference a saved criterion
    pub fn alias(name: impl Into<String>) -> AliasRef {
        AliasRef::new(name)
    }

    /// Create an AND filter
    pub fn and(criteria: Vec<Criterion>) -> Filter {
        Filter::and(criteria)
    }

    /// Create an OR filter
    pub fn or(criteria: Vec<Criterion>) -> Filter {
        Filter::or(criteria)
    }

    /// Create a group passing when every filter passes
    pub fn all(filters: Vec<Filter>) -> FilterGroup {
        FilterGroup::and(filters)
    }

    /// Create a group passing when any filter passes
    pub fn any(filters: Vec<Filter>) -> FilterGroup {
        FilterGroup::or(filters)
    }
}

/// Convenience functions for common filter patterns
impl FilterBuilder {
    /// Create a filter for text equality (normalized)
    pub fn text_equals(path: &str, text: impl Into<String>) -> Criterion {
        Self::string(path, StringOperator::Equals, text.into())
    }

    /// Create a filter for text containment (normalized)
    pub fn text_contains(path: &str, text: impl Into<String>) -> Criterion {
        Self::string(path, StringOperator::Contains, text.into())
    }

    /// Create a filter for number equality
    pub fn number_equals(path: &str, value: f64) -> Criterion {
        Self::number(path, NumberOperator::Equals, value)
    }

    /// Create a filter for path greater than value
    pub fn greater_than(path: &str, value: f64) -> Criterion {
        Self::number(path, NumberOperator::Greater, value)
    }

    /// Create a filter for path less than value
    pub fn less_than(path: &str, value: f64) -> Criterion {
        Self::number(path, NumberOperator::Less, value)
    }

    /// Create an inclusive range filter
    pub fn between(path: &str, low: f64, high: f64) -> Criterion {
        Self::number(path, NumberOperator::Between, vec![low, high])
    }

    /// Create a filter for a true flag
    pub fn is_true(path: &str) -> Criterion {
        Self::boolean(path, BooleanOperator::Is, true)
    }

    /// Create a filter for a present, non-null value
    pub fn is_present(path: &str) -> Criterion {
        Self::boolean(path, BooleanOperator::IsNotNil, Value::Undefined)
    }

    /// Create a filter for arrays sharing at least one item with `values`
    pub fn includes_any<T: Into<Value>>(path: &str, values: Vec<T>) -> Criterion {
        Self::array(path, ArrayOperator::IncludesAny, values)
    }

    /// Create a filter for points within `radius` kilometers
    pub fn within_km(path: &str, lat: f64, lng: f64, radius: f64) -> Criterion {
        let area = Value::object([
            ("lat", Value::Number(lat)),
            ("lng", Value::Number(lng)),
            ("radius", Value::Number(radius)),
            ("unit", Value::from("km")),
        ]);
        Self::geo(path, GeoOperator::InRadius, area)
    }
}

impl Default for FilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::MatchValue;
    use crate::expression::LogicalOperator;
    use crate::operator::CriterionType;

    #[test]
    fn test_typed_constructors() {
        let c = FilterBuilder::number("user.age", NumberOperator::Less, 30);
        assert_eq!(c.describe(), "NUMBER:LESS");
        assert_eq!(c.value_path, vec!["user".to_string(), "age".to_string()]);

        let c = FilterBuilder::text_contains("name", "John");
        assert_eq!(c.criterion_type(), CriterionType::String);
        assert!(c.normalize);

        let c = FilterBuilder::between("age", 18.0, 65.0);
        assert!(matches!(&c.match_value, MatchValue::Literal(Value::Array(b)) if b.len() == 2));

        let c = FilterBuilder::within_km("location", 48.85, 2.35, 10.0);
        assert_eq!(c.describe(), "GEO:IN-RADIUS");
    }

    #[test]
    fn test_composition() {
        let group = FilterBuilder::any(vec![
            FilterBuilder::and(vec![
                FilterBuilder::less_than("age", 30.0),
                FilterBuilder::is_true("active"),
            ]),
            FilterBuilder::or(vec![FilterBuilder::includes_any("tags", vec!["rust"])]),
        ]);
        assert_eq!(group.operator, LogicalOperator::Or);
        assert_eq!(group.filters[0].criteria.len(), 2);
        assert_eq!(group.filters[1].operator, LogicalOperator::Or);

        let filter = FilterBuilder::and(vec![]).with(FilterBuilder::alias("adults").match_value(21));
        assert_eq!(filter.criteria.len(), 1);
    }
}
