//! Batch filtering over record collections.
//!
//! Records are evaluated concurrently, at most `concurrency` at a time when a
//! limit is given. Output keeps the input order.

use super::filter::GroupPlan;
use super::FilterEngine;
use crate::error::Result;
use crate::expression::Expression;
use crate::value::Value;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use log::trace;
use std::collections::BTreeMap;

impl FilterEngine {
    /// Keep the records that pass `expression`.
    ///
    /// `concurrency` overrides the configured limit; zero means unbounded.
    pub async fn filter_collection(
        &self,
        records: &[Value],
        expression: &Expression,
        concurrency: Option<usize>,
    ) -> Result<Vec<Value>> {
        if expression.is_empty() {
            return Ok(records.to_vec());
        }

        let plan = self.plan(expression)?;
        let plans = [Some(plan.group)];
        let verdicts = self
            .verdicts(records, &plans, self.limit(concurrency))
            .await;

        Ok(records
            .iter()
            .zip(verdicts)
            .filter(|(_, passed)| passed.first().copied().unwrap_or(false))
            .map(|(record, _)| record.clone())
            .collect())
    }

    /// Partition records by several named expressions in one pass.
    ///
    /// Each name maps to the records passing its expression, in input order.
    pub async fn filter_collection_multiple(
        &self,
        records: &[Value],
        expressions: &BTreeMap<String, Expression>,
        concurrency: Option<usize>,
    ) -> Result<BTreeMap<String, Vec<Value>>> {
        let plans = expressions
            .values()
            .map(|expression| {
                if expression.is_empty() {
                    Ok(None)
                } else {
                    self.plan(expression).map(|plan| Some(plan.group))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let verdicts = self
            .verdicts(records, &plans, self.limit(concurrency))
            .await;

        let mut partitions: BTreeMap<String, Vec<Value>> = expressions
            .keys()
            .map(|name| (name.clone(), Vec::new()))
            .collect();
        for (record, passed) in records.iter().zip(verdicts) {
            for ((_, partition), passed) in partitions.iter_mut().zip(passed) {
                if passed {
                    partition.push(record.clone());
                }
            }
        }
        Ok(partitions)
    }

    fn limit(&self, concurrency: Option<usize>) -> Option<usize> {
        concurrency
            .or(self.config.concurrency)
            .filter(|&limit| limit > 0)
    }

    /// One verdict per plan for every record; `None` plans always pass
    async fn verdicts(
        &self,
        records: &[Value],
        plans: &[Option<GroupPlan>],
        limit: Option<usize>,
    ) -> Vec<Vec<bool>> {
        trace!(
            "Filtering {} records against {} expression(s), limit {:?}",
            records.len(),
            plans.len(),
            limit
        );
        match limit {
            Some(limit) => {
                stream::iter(records)
                    .map(|record| self.record_verdicts(record, plans))
                    .buffered(limit)
                    .collect()
                    .await
            }
            None => join_all(records.iter().map(|record| self.record_verdicts(record, plans))).await,
        }
    }

    async fn record_verdicts(&self, record: &Value, plans: &[Option<GroupPlan>]) -> Vec<bool> {
        let context = Value::Undefined;
        let context = &context;
        join_all(plans.iter().map(|plan| async move {
            match plan {
                Some(group) => self.evaluate_group(record, group, context).await.passed,
                None => true,
            }
        }))
        .await
    }
}
