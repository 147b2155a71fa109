//! Filter and filter group evaluation.
//!
//! Evaluation order:
//! - An AND filter runs its light criteria first and only runs the heavy
//!   ones when every light criterion passed.
//! - An AND group runs its filters one after another and stops at the first
//!   failure.
//! - Everything else runs its members concurrently.
//!
//! Results always list members in declaration order.

use super::FilterEngine;
use crate::criteria::{Criterion, CriterionNode};
use crate::error::Result;
use crate::expression::{Expression, Level, LogicalOperator};
use crate::result::{CriteriaResult, FilterGroupResult, FilterResult, MatchResult};
use crate::value::Value;
use futures::future::join_all;
use log::debug;

/// A filter whose aliases have been resolved
#[derive(Debug, Clone)]
pub(crate) struct FilterPlan {
    pub operator: LogicalOperator,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone)]
pub(crate) struct GroupPlan {
    pub operator: LogicalOperator,
    pub filters: Vec<FilterPlan>,
}

/// An expression ready to evaluate, in group form
#[derive(Debug, Clone)]
pub(crate) struct Plan {
    pub group: GroupPlan,
    pub level: Level,
}

impl Plan {
    /// Shape a group result back into the level of the original expression
    pub fn unwrap(&self, mut result: FilterGroupResult) -> MatchResult {
        match self.level {
            Level::FilterGroup => MatchResult::FilterGroup(result),
            Level::Filter => match result.results.pop() {
                Some(filter) => MatchResult::Filter(filter),
                // An empty filter was dropped from the group
                None => MatchResult::Filter(FilterResult {
                    operator: self
                        .group
                        .filters
                        .first()
                        .map_or(LogicalOperator::And, |f| f.operator),
                    passed: true,
                    reason: "Filter passed: no criteria".to_string(),
                    results: Vec::new(),
                }),
            },
            Level::Criterion => {
                let criteria = result.results.pop().and_then(|mut f| f.results.pop());
                match criteria {
                    Some(criteria) => MatchResult::Criteria(criteria),
                    None => MatchResult::FilterGroup(result),
                }
            }
        }
    }
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "passed"
    } else {
        "failed"
    }
}

fn filter_result(operator: LogicalOperator, results: Vec<CriteriaResult>) -> FilterResult {
    let passed = operator.combine(results.iter().map(|r| r.passed));
    let passing = results.iter().filter(|r| r.passed).count();
    let reason = format!(
        "Filter \"{}\" {}: {} of {} criteria passed",
        operator,
        verdict(passed),
        passing,
        results.len()
    );
    FilterResult {
        operator,
        passed,
        reason,
        results,
    }
}

impl FilterEngine {
    /// Turn an expression into its group form and resolve every alias
    pub(crate) fn plan(&self, expression: &Expression) -> Result<Plan> {
        let (group, level) = expression.to_filter_group();
        let filters = group
            .filters
            .into_iter()
            .map(|filter| {
                let criteria = filter
                    .criteria
                    .into_iter()
                    .map(|node| match node {
                        CriterionNode::Criterion(criterion) => Ok(*criterion),
                        CriterionNode::Alias(reference) => self.aliases.resolve(&reference),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FilterPlan {
                    operator: filter.operator,
                    criteria,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Plan {
            group: GroupPlan {
                operator: group.operator,
                filters,
            },
            level,
        })
    }

    pub(crate) async fn evaluate_filter(
        &self,
        record: &Value,
        filter: &FilterPlan,
        context: &Value,
    ) -> FilterResult {
        let criteria = &filter.criteria;

        if filter.operator == LogicalOperator::And && criteria.len() > 1 {
            let (heavy, light): (Vec<usize>, Vec<usize>) =
                (0..criteria.len()).partition(|&i| criteria[i].heavy);

            if !heavy.is_empty() && !light.is_empty() {
                let light_results = join_all(
                    light
                        .iter()
                        .map(|&i| self.evaluate_criterion(record, &criteria[i], context)),
                )
                .await;

                let failures = light_results.iter().filter(|r| !r.passed).count();
                if failures > 0 {
                    debug!(
                        "Skipping {} heavy criteria after {} light failure(s)",
                        heavy.len(),
                        failures
                    );
                    return FilterResult {
                        operator: filter.operator,
                        passed: false,
                        reason: format!(
                            "Filter \"AND\" failed: {} of {} light criteria failed, {} heavy criteria skipped",
                            failures,
                            light.len(),
                            heavy.len()
                        ),
                        results: light_results,
                    };
                }

                let heavy_results = join_all(
                    heavy
                        .iter()
                        .map(|&i| self.evaluate_criterion(record, &criteria[i], context)),
                )
                .await;

                // Back to declaration order
                let mut slots: Vec<Option<CriteriaResult>> =
                    (0..criteria.len()).map(|_| None).collect();
                for (i, result) in light.iter().zip(light_results) {
                    slots[*i] = Some(result);
                }
                for (i, result) in heavy.iter().zip(heavy_results) {
                    slots[*i] = Some(result);
                }
                return filter_result(filter.operator, slots.into_iter().flatten().collect());
            }
        }

        let results = join_all(
            criteria
                .iter()
                .map(|criterion| self.evaluate_criterion(record, criterion, context)),
        )
        .await;
        filter_result(filter.operator, results)
    }

    pub(crate) async fn evaluate_group(
        &self,
        record: &Value,
        group: &GroupPlan,
        context: &Value,
    ) -> FilterGroupResult {
        let operator = group.operator;
        let active: Vec<&FilterPlan> = group
            .filters
            .iter()
            .filter(|f| !f.criteria.is_empty())
            .collect();

        if active.is_empty() {
            return FilterGroupResult {
                operator,
                passed: true,
                reason: format!("Filter group \"{}\" passed: no active filters", operator),
                results: Vec::new(),
            };
        }

        let results = match operator {
            LogicalOperator::And => {
                let mut results = Vec::with_capacity(active.len());
                for (i, filter) in active.iter().enumerate() {
                    let result = self.evaluate_filter(record, filter, context).await;
                    let failed = !result.passed;
                    results.push(result);
                    if failed {
                        let skipped = active.len() - i - 1;
                        if skipped > 0 {
                            debug!(
                                "Filter group short-circuited at filter {} of {}",
                                i + 1,
                                active.len()
                            );
                        }
                        return FilterGroupResult {
                            operator,
                            passed: false,
                            reason: format!(
                                "Filter group \"AND\" failed at filter {} of {}, {} skipped",
                                i + 1,
                                active.len(),
                                skipped
                            ),
                            results,
                        };
                    }
                }
                results
            }
            LogicalOperator::Or => {
                join_all(
                    active
                        .iter()
                        .map(|filter| self.evaluate_filter(record, filter, context)),
                )
                .await
            }
        };

        let passed = operator.combine(results.iter().map(|r| r.passed));
        let passing = results.iter().filter(|r| r.passed).count();
        FilterGroupResult {
            operator,
            passed,
            reason: format!(
                "Filter group \"{}\" {}: {} of {} filters passed",
                operator,
                verdict(passed),
                passing,
                results.len()
            ),
            results,
        }
    }
}
