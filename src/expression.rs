//! Filter expression tree.
//!
//! An expression is one of three levels:
//! - a single criterion
//! - a filter: criteria combined with AND or OR
//! - a filter group: filters combined with AND or OR
//!
//! Evaluation always works on the group form; [`Expression::to_filter_group`]
//! lifts the lower levels and remembers which level the caller gave so the
//! result can be unwrapped again.

use crate::criteria::{AliasRef, Criterion, CriterionNode};
use serde::Serialize;

/// Logical combinator for filters and groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "AND" => Some(LogicalOperator::And),
            "OR" => Some(LogicalOperator::Or),
            _ => None,
        }
    }

    /// Fold member verdicts: AND needs all, OR needs any
    pub fn combine<I: IntoIterator<Item = bool>>(&self, verdicts: I) -> bool {
        let mut verdicts = verdicts.into_iter();
        match self {
            LogicalOperator::And => verdicts.all(|passed| passed),
            LogicalOperator::Or => verdicts.any(|passed| passed),
        }
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criteria combined by one logical operator
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub operator: LogicalOperator,
    pub criteria: Vec<CriterionNode>,
}

impl Filter {
    pub fn new(operator: LogicalOperator, criteria: Vec<CriterionNode>) -> Self {
        Self { operator, criteria }
    }

    /// Create an AND filter
    pub fn and<I, N>(criteria: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CriterionNode>,
    {
        Self::new(
            LogicalOperator::And,
            criteria.into_iter().map(Into::into).collect(),
        )
    }

    /// Create an OR filter
    pub fn or<I, N>(criteria: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<CriterionNode>,
    {
        Self::new(
            LogicalOperator::Or,
            criteria.into_iter().map(Into::into).collect(),
        )
    }

    /// Append a criterion or alias reference
    pub fn with(mut self, node: impl Into<CriterionNode>) -> Self {
        self.criteria.push(node.into());
        self
    }
}

/// Filters combined by one logical operator
#[derive(Debug, Clone, Default)]
pub struct FilterGroup {
    pub operator: LogicalOperator,
    pub filters: Vec<Filter>,
}

impl FilterGroup {
    pub fn new(operator: LogicalOperator, filters: Vec<Filter>) -> Self {
        Self { operator, filters }
    }

    /// Create an AND group
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::new(LogicalOperator::And, filters)
    }

    /// Create an OR group
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::new(LogicalOperator::Or, filters)
    }
}

/// Nesting level of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Criterion,
    Filter,
    FilterGroup,
}

/// A filter expression at any level
#[derive(Debug, Clone)]
pub enum Expression {
    Criterion(CriterionNode),
    Filter(Filter),
    FilterGroup(FilterGroup),
}

impl Expression {
    pub fn level(&self) -> Level {
        match self {
            Expression::Criterion(_) => Level::Criterion,
            Expression::Filter(_) => Level::Filter,
            Expression::FilterGroup(_) => Level::FilterGroup,
        }
    }

    /// Lift the expression to the group form.
    ///
    /// A criterion becomes `AND[AND[criterion]]` and a filter `AND[filter]`.
    pub fn to_filter_group(&self) -> (FilterGroup, Level) {
        let group = match self {
            Expression::Criterion(node) => FilterGroup::and(vec![Filter::new(
                LogicalOperator::And,
                vec![node.clone()],
            )]),
            Expression::Filter(filter) => FilterGroup::and(vec![filter.clone()]),
            Expression::FilterGroup(group) => group.clone(),
        };
        (group, self.level())
    }

    /// Number of criteria across non-empty filters.
    ///
    /// Alias references count as criteria.
    pub fn count_active_filters(&self) -> usize {
        match self {
            Expression::Criterion(_) => 1,
            Expression::Filter(filter) => filter.criteria.len(),
            Expression::FilterGroup(group) => group.filters.iter().map(|f| f.criteria.len()).sum(),
        }
    }

    /// True when no filter has any criterion
    pub fn is_empty(&self) -> bool {
        self.count_active_filters() == 0
    }
}

impl From<Criterion> for Expression {
    fn from(criterion: Criterion) -> Self {
        Expression::Criterion(criterion.into())
    }
}

impl From<AliasRef> for Expression {
    fn from(reference: AliasRef) -> Self {
        Expression::Criterion(reference.into())
    }
}

impl From<CriterionNode> for Expression {
    fn from(node: CriterionNode) -> Self {
        Expression::Criterion(node)
    }
}

impl From<Filter> for Expression {
    fn from(filter: Filter) -> Self {
        Expression::Filter(filter)
    }
}

impl From<FilterGroup> for Expression {
    fn from(group: FilterGroup) -> Self {
        Expression::FilterGroup(group)
    }
}
