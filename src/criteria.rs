//! Criterion model.
//!
//! A criterion is the atomic test of the engine: "the value at this path,
//! compared with this operator against this match value". The operator is
//! bound to the criterion type through [`CriterionKind`], so a NUMBER
//! criterion can only ever carry a NUMBER operator.

pub mod callback;

pub use callback::{
    Callback, CriteriaMapper, CriteriaMapperArgs, CustomArgs, CustomPredicate, MatchValueArgs,
    MatchValueFn, ValueMapper, ValueMapperArgs,
};

use crate::error::{FilterError, Result};
use crate::operator::{
    self, ArrayOperator, BooleanOperator, CriterionType, DateOperator, GeoOperator, MapOperator,
    NumberOperator, ObjectOperator, SetOperator, StringOperator,
};
use crate::path::parse_path;
use crate::value::Value;
use std::fmt;

/// Criterion type together with its operator
#[derive(Clone)]
pub enum CriterionKind {
    Array(ArrayOperator),
    Boolean(BooleanOperator),
    /// Caller-defined predicate; bypasses path resolution entirely
    Custom(CustomPredicate),
    Date(DateOperator),
    Geo(GeoOperator),
    Map(MapOperator),
    Number(NumberOperator),
    Object(ObjectOperator),
    Set(SetOperator),
    String(StringOperator),
}

impl CriterionKind {
    /// Build a kind from a type and an operator wire name.
    ///
    /// CUSTOM cannot be built this way since it needs a predicate.
    pub fn parse(criterion_type: CriterionType, operator: &str) -> Result<Self> {
        fn unknown(criterion_type: CriterionType, operator: &str) -> FilterError {
            FilterError::UnknownOperator {
                kind: criterion_type.as_str().to_string(),
                operator: operator.to_string(),
            }
        }

        let kind = match criterion_type {
            CriterionType::Array => ArrayOperator::parse(operator).map(CriterionKind::Array),
            CriterionType::Boolean => BooleanOperator::parse(operator).map(CriterionKind::Boolean),
            CriterionType::Custom => {
                return Err(FilterError::validation(
                    "type",
                    "CUSTOM criteria require a predicate",
                ))
            }
            CriterionType::Date => DateOperator::parse(operator).map(CriterionKind::Date),
            CriterionType::Geo => GeoOperator::parse(operator).map(CriterionKind::Geo),
            CriterionType::Map => MapOperator::parse(operator).map(CriterionKind::Map),
            CriterionType::Number => NumberOperator::parse(operator).map(CriterionKind::Number),
            CriterionType::Object => ObjectOperator::parse(operator).map(CriterionKind::Object),
            CriterionType::Set => SetOperator::parse(operator).map(CriterionKind::Set),
            CriterionType::String => StringOperator::parse(operator).map(CriterionKind::String),
        };
        kind.ok_or_else(|| unknown(criterion_type, operator))
    }

    pub fn criterion_type(&self) -> CriterionType {
        match self {
            CriterionKind::Array(_) => CriterionType::Array,
            CriterionKind::Boolean(_) => CriterionType::Boolean,
            CriterionKind::Custom(_) => CriterionType::Custom,
            CriterionKind::Date(_) => CriterionType::Date,
            CriterionKind::Geo(_) => CriterionType::Geo,
            CriterionKind::Map(_) => CriterionType::Map,
            CriterionKind::Number(_) => CriterionType::Number,
            CriterionKind::Object(_) => CriterionType::Object,
            CriterionKind::Set(_) => CriterionType::Set,
            CriterionKind::String(_) => CriterionType::String,
        }
    }

    /// Wire name of the operator; `CUSTOM` for custom predicates
    pub fn operator_name(&self) -> &'static str {
        match self {
            CriterionKind::Array(op) => op.as_str(),
            CriterionKind::Boolean(op) => op.as_str(),
            CriterionKind::Custom(_) => "CUSTOM",
            CriterionKind::Date(op) => op.as_str(),
            CriterionKind::Geo(op) => op.as_str(),
            CriterionKind::Map(op) => op.as_str(),
            CriterionKind::Number(op) => op.as_str(),
            CriterionKind::Object(op) => op.as_str(),
            CriterionKind::Set(op) => op.as_str(),
            CriterionKind::String(op) => op.as_str(),
        }
    }

    /// Apply the operator predicate.
    ///
    /// Custom predicates are asynchronous and run by the engine, so they
    /// never reach this function; they report `false` here.
    pub fn evaluate(&self, value: &Value, match_value: &Value) -> bool {
        match self {
            CriterionKind::Array(op) => operator::array::evaluate(value, *op, match_value),
            CriterionKind::Boolean(op) => operator::boolean::evaluate(value, *op, match_value),
            CriterionKind::Custom(_) => false,
            CriterionKind::Date(op) => operator::date::evaluate(value, *op, match_value),
            CriterionKind::Geo(op) => operator::geo::evaluate(value, *op, match_value),
            CriterionKind::Map(op) => operator::map::evaluate(value, *op, match_value),
            CriterionKind::Number(op) => operator::number::evaluate(value, *op, match_value),
            CriterionKind::Object(op) => operator::object::evaluate(value, *op, match_value),
            CriterionKind::Set(op) => operator::set::evaluate(value, *op, match_value),
            CriterionKind::String(op) => operator::string::evaluate(value, *op, match_value),
        }
    }
}

impl fmt::Debug for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.criterion_type(), self.operator_name())
    }
}

impl From<ArrayOperator> for CriterionKind {
    fn from(op: ArrayOperator) -> Self {
        CriterionKind::Array(op)
    }
}

impl From<BooleanOperator> for CriterionKind {
    fn from(op: BooleanOperator) -> Self {
        CriterionKind::Boolean(op)
    }
}

impl From<DateOperator> for CriterionKind {
    fn from(op: DateOperator) -> Self {
        CriterionKind::Date(op)
    }
}

impl From<GeoOperator> for CriterionKind {
    fn from(op: GeoOperator) -> Self {
        CriterionKind::Geo(op)
    }
}

impl From<MapOperator> for CriterionKind {
    fn from(op: MapOperator) -> Self {
        CriterionKind::Map(op)
    }
}

impl From<NumberOperator> for CriterionKind {
    fn from(op: NumberOperator) -> Self {
        CriterionKind::Number(op)
    }
}

impl From<ObjectOperator> for CriterionKind {
    fn from(op: ObjectOperator) -> Self {
        CriterionKind::Object(op)
    }
}

impl From<SetOperator> for CriterionKind {
    fn from(op: SetOperator) -> Self {
        CriterionKind::Set(op)
    }
}

impl From<StringOperator> for CriterionKind {
    fn from(op: StringOperator) -> Self {
        CriterionKind::String(op)
    }
}

/// Where a criterion's match value comes from
#[derive(Clone)]
pub enum MatchValue {
    Literal(Value),
    /// Resolved against the record being evaluated (`{"$path": ...}`)
    Path(Vec<String>),
    /// Produced by a callback at evaluation time
    Computed(MatchValueFn),
}

impl MatchValue {
    pub fn path(dotted: &str) -> Self {
        MatchValue::Path(parse_path(dotted))
    }

    /// Short text used in results when the value itself is not known
    pub fn describe(&self) -> String {
        match self {
            MatchValue::Literal(value) => value.to_display_string(),
            MatchValue::Path(path) => format!("$path:{}", path.join(".")),
            MatchValue::Computed(_) => "<computed>".to_string(),
        }
    }
}

impl Default for MatchValue {
    fn default() -> Self {
        MatchValue::Literal(Value::Undefined)
    }
}

impl fmt::Debug for MatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchValue::Literal(value) => write!(f, "{:?}", value),
            other => f.write_str(&other.describe()),
        }
    }
}

/// A single typed test against a record
#[derive(Clone)]
pub struct Criterion {
    pub kind: CriterionKind,
    pub match_value: MatchValue,
    /// Empty means the whole record
    pub value_path: Vec<String>,
    /// Used when the path is missing and no array branching happened
    pub default_value: Value,
    pub normalize: bool,
    pub match_in_array: bool,
    /// Expensive criteria run after the cheap ones inside an AND filter
    pub heavy: bool,
    pub alias: Option<String>,
    pub criteria_mapper: Option<CriteriaMapper>,
    pub value_mapper: Option<ValueMapper>,
}

impl Criterion {
    /// Create a criterion with the defaults of its type
    pub fn new(kind: impl Into<CriterionKind>, match_value: impl Into<Value>) -> Self {
        let kind = kind.into();
        let criterion_type = kind.criterion_type();
        Self {
            kind,
            match_value: MatchValue::Literal(match_value.into()),
            value_path: Vec::new(),
            default_value: Value::Undefined,
            normalize: criterion_type.normalizes_by_default(),
            match_in_array: criterion_type.matches_in_array_by_default(),
            heavy: false,
            alias: None,
            criteria_mapper: None,
            value_mapper: None,
        }
    }

    /// Create a CUSTOM criterion
    pub fn custom(predicate: CustomPredicate, match_value: impl Into<Value>) -> Self {
        Self::new(CriterionKind::Custom(predicate), match_value)
    }

    pub fn criterion_type(&self) -> CriterionType {
        self.kind.criterion_type()
    }

    /// `TYPE:OPERATOR`
    pub fn describe(&self) -> String {
        format!("{:?}", self.kind)
    }

    /// Set the value path from a dotted string
    pub fn path(mut self, dotted: &str) -> Self {
        self.value_path = parse_path(dotted);
        self
    }

    pub fn value_path(mut self, segments: Vec<String>) -> Self {
        self.value_path = segments;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn match_in_array(mut self, match_in_array: bool) -> Self {
        self.match_in_array = match_in_array;
        self
    }

    pub fn heavy(mut self, heavy: bool) -> Self {
        self.heavy = heavy;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn criteria_mapper(mut self, mapper: CriteriaMapper) -> Self {
        self.criteria_mapper = Some(mapper);
        self
    }

    pub fn value_mapper(mut self, mapper: ValueMapper) -> Self {
        self.value_mapper = Some(mapper);
        self
    }

    /// Read the match value from another field of the record
    pub fn match_path(mut self, dotted: &str) -> Self {
        self.match_value = MatchValue::path(dotted);
        self
    }

    /// Compute the match value with a callback at evaluation time
    pub fn computed(mut self, func: MatchValueFn) -> Self {
        self.match_value = MatchValue::Computed(func);
        self
    }
}

impl fmt::Debug for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("kind", &self.kind)
            .field("match_value", &self.match_value)
            .field("value_path", &self.value_path.join("."))
            .field("default_value", &self.default_value)
            .field("normalize", &self.normalize)
            .field("match_in_array", &self.match_in_array)
            .field("heavy", &self.heavy)
            .field("alias", &self.alias)
            .field("criteria_mapper", &self.criteria_mapper.is_some())
            .field("value_mapper", &self.value_mapper.is_some())
            .finish()
    }
}

/// Reference to a saved criterion, with optional overrides.
///
/// Every override that is `Some` replaces the saved field. Overriding the
/// type resets the default value and re-validates the operator.
#[derive(Debug, Clone, Default)]
pub struct AliasRef {
    pub alias: String,
    pub criterion_type: Option<CriterionType>,
    pub operator: Option<String>,
    pub match_value: Option<MatchValue>,
    pub value_path: Option<Vec<String>>,
    pub normalize: Option<bool>,
    pub match_in_array: Option<bool>,
    pub criteria_mapper: Option<CriteriaMapper>,
    pub value_mapper: Option<ValueMapper>,
}

impl AliasRef {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Default::default()
        }
    }

    pub fn criterion_type(mut self, criterion_type: CriterionType) -> Self {
        self.criterion_type = Some(criterion_type);
        self
    }

    pub fn operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }

    pub fn match_value(mut self, match_value: impl Into<Value>) -> Self {
        self.match_value = Some(MatchValue::Literal(match_value.into()));
        self
    }

    pub fn match_path(mut self, dotted: &str) -> Self {
        self.match_value = Some(MatchValue::path(dotted));
        self
    }

    pub fn path(mut self, dotted: &str) -> Self {
        self.value_path = Some(parse_path(dotted));
        self
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn match_in_array(mut self, match_in_array: bool) -> Self {
        self.match_in_array = Some(match_in_array);
        self
    }

    pub fn criteria_mapper(mut self, mapper: CriteriaMapper) -> Self {
        self.criteria_mapper = Some(mapper);
        self
    }

    pub fn value_mapper(mut self, mapper: ValueMapper) -> Self {
        self.value_mapper = Some(mapper);
        self
    }
}

/// A position in a filter: either an inline criterion or an alias reference
#[derive(Debug, Clone)]
pub enum CriterionNode {
    Criterion(Box<Criterion>),
    Alias(AliasRef),
}

impl From<Criterion> for CriterionNode {
    fn from(criterion: Criterion) -> Self {
        CriterionNode::Criterion(Box::new(criterion))
    }
}

impl From<AliasRef> for CriterionNode {
    fn from(reference: AliasRef) -> Self {
        CriterionNode::Alias(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_defaults() {
        let c = Criterion::new(StringOperator::Contains, "john");
        assert!(c.normalize);
        assert!(c.match_in_array);

        let c = Criterion::new(ArrayOperator::IncludesAny, Value::from(vec!["a"]));
        assert!(c.normalize);
        assert!(!c.match_in_array);

        let c = Criterion::new(NumberOperator::Less, 30);
        assert!(!c.normalize);
        assert!(c.match_in_array);
        assert!(!c.heavy);
        assert!(c.default_value.is_undefined());

        let c = Criterion::new(GeoOperator::InRadius, Value::Undefined);
        assert!(!c.normalize);
        assert!(!c.match_in_array);
    }

    #[test]
    fn test_parse_kind() -> anyhow::Result<()> {
        let kind = CriterionKind::parse(CriterionType::Number, "GREATER-EQUALS")?;
        assert_eq!(kind.operator_name(), "GREATER-OR-EQUALS");
        assert_eq!(kind.criterion_type(), CriterionType::Number);

        let err = CriterionKind::parse(CriterionType::Number, "CONTAINS").unwrap_err();
        assert_eq!(err.to_string(), "Unknown NUMBER operator: CONTAINS");

        assert!(CriterionKind::parse(CriterionType::Custom, "ANY").is_err());
        Ok(())
    }

    #[test]
    fn test_dispatch() {
        let kind = CriterionKind::from(NumberOperator::Less);
        assert!(kind.evaluate(&Value::Number(25.0), &Value::Number(30.0)));
        let kind = CriterionKind::from(StringOperator::StartsWith);
        assert!(kind.evaluate(&Value::from("john"), &Value::from("jo")));
    }

    #[test]
    fn test_builder_and_describe() {
        let c = Criterion::new(NumberOperator::Less, 30)
            .path("user.age")
            .heavy(true)
            .alias("young");
        assert_eq!(c.value_path, vec!["user".to_string(), "age".to_string()]);
        assert_eq!(c.describe(), "NUMBER:LESS");
        assert_eq!(c.alias.as_deref(), Some("young"));
        assert_eq!(MatchValue::path("a.b").describe(), "$path:a.b");
    }
}
