//! Evaluation of a single criterion.

use super::FilterEngine;
use crate::criteria::{
    CriteriaMapperArgs, Criterion, CriterionKind, CustomArgs, MatchValue, MatchValueArgs,
    ValueMapperArgs,
};
use crate::path::{resolve_path, Resolved};
use crate::result::CriteriaResult;
use crate::value::Value;
use futures::future::{BoxFuture, FutureExt};
use log::{debug, warn};
use std::borrow::Cow;

impl FilterEngine {
    /// Evaluate one criterion; errors become a failed result
    pub(crate) fn evaluate_criterion<'a>(
        &'a self,
        record: &'a Value,
        criterion: &'a Criterion,
        context: &'a Value,
    ) -> BoxFuture<'a, CriteriaResult> {
        async move {
            match self.try_evaluate_criterion(record, criterion, context).await {
                Ok(result) => result,
                Err(err) => {
                    warn!("{} raised an error: {:#}", label(criterion), err);
                    CriteriaResult {
                        match_value: criterion.match_value.describe(),
                        passed: false,
                        reason: err.to_string(),
                        value: Value::Undefined,
                    }
                }
            }
        }
        .boxed()
    }

    async fn try_evaluate_criterion(
        &self,
        record: &Value,
        criterion: &Criterion,
        context: &Value,
    ) -> anyhow::Result<CriteriaResult> {
        let mut match_value = match &criterion.match_value {
            MatchValue::Literal(value) => value.clone(),
            MatchValue::Path(path) if record.is_container() => {
                resolve_path(record, path, &Value::Undefined).value
            }
            MatchValue::Path(_) => Value::Undefined,
            MatchValue::Computed(func) => {
                func.call(MatchValueArgs {
                    context: context.clone(),
                    criterion: criterion.clone(),
                    value: record.clone(),
                })
                .await?
            }
        };

        // Custom predicates see the whole record and skip everything below
        if let CriterionKind::Custom(predicate) = &criterion.kind {
            let passed = predicate
                .call(CustomArgs {
                    match_value: match_value.clone(),
                    value: record.clone(),
                })
                .await?;
            return Ok(criteria_result(
                criterion,
                &match_value,
                record.clone(),
                passed,
                None,
            ));
        }

        if criterion.normalize {
            match_value = self.normalizer.normalize(&match_value);
        }

        if let Some(mapper) = &criterion.criteria_mapper {
            let mut seed = criterion.clone();
            seed.match_value = MatchValue::Literal(match_value);
            seed.criteria_mapper = None;
            let mut mapped = mapper
                .call(CriteriaMapperArgs {
                    criterion: seed,
                    value: record.clone(),
                    context: context.clone(),
                })
                .await?;
            // A mapped criterion is evaluated as-is, never mapped again
            mapped.criteria_mapper = None;
            debug!(
                "Criteria mapper turned {} into {}",
                criterion.describe(),
                mapped.describe()
            );
            return Ok(self.evaluate_criterion(record, &mapped, context).await);
        }

        let source = match &criterion.value_mapper {
            Some(mapper) => Cow::Owned(
                mapper
                    .call(ValueMapperArgs {
                        value: record.clone(),
                        criterion: criterion.clone(),
                        context: context.clone(),
                    })
                    .await?,
            ),
            None => Cow::Borrowed(record),
        };

        let Resolved {
            value,
            array_branching,
        } = resolve_path(&source, &criterion.value_path, &criterion.default_value);

        let value = if criterion.normalize {
            self.normalizer.normalize(&value)
        } else {
            value
        };

        let (passed, scope) = match &value {
            Value::Array(items) if array_branching => (
                items.iter().any(|item| criterion.kind.evaluate(item, &match_value)),
                Some(format!("any of {} branch values", items.len())),
            ),
            Value::Array(items) if criterion.match_in_array => (
                items.iter().any(|item| criterion.kind.evaluate(item, &match_value)),
                Some(format!("any of {} array items", items.len())),
            ),
            _ => (criterion.kind.evaluate(&value, &match_value), None),
        };

        Ok(criteria_result(criterion, &match_value, value, passed, scope))
    }
}

fn label(criterion: &Criterion) -> String {
    match &criterion.kind {
        CriterionKind::Custom(_) => "CUSTOM predicate".to_string(),
        kind => format!("{} \"{}\"", kind.criterion_type(), kind.operator_name()),
    }
}

fn criteria_result(
    criterion: &Criterion,
    match_value: &Value,
    value: Value,
    passed: bool,
    scope: Option<String>,
) -> CriteriaResult {
    let verdict = if passed { "passed" } else { "failed" };
    let reason = match scope {
        Some(scope) => format!("{} {} on {}", label(criterion), verdict, scope),
        None => format!("{} {}", label(criterion), verdict),
    };
    CriteriaResult {
        match_value: match_value.to_display_string(),
        passed,
        reason,
        value,
    }
}
