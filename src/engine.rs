//! Filter evaluation engine.
//!
//! The engine owns the alias registry and the normalizer cache. Every
//! evaluation first turns the expression into a plan (canonical group form
//! with aliases resolved), so structural errors surface before any record
//! is touched. Errors raised while a single criterion runs never escape: they
//! become a failed criterion result.

pub mod collection;
pub mod criteria;
pub mod filter;

use crate::alias::AliasRegistry;
use crate::config::EngineConfig;
use crate::criteria::Criterion;
use crate::error::Result;
use crate::expression::Expression;
use crate::normalize::Normalizer;
use crate::operator::CriterionType;
use crate::result::MatchResult;
use crate::schema;
use crate::value::Value;
use serde::Serialize;
use std::fmt::Write;

/// Outcome of [`FilterEngine::validate_expression`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Evaluates filter expressions against records
pub struct FilterEngine {
    config: EngineConfig,
    aliases: AliasRegistry,
    normalizer: Normalizer,
}

impl FilterEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let normalizer = if config.cache_normalized_text {
            Normalizer::new()
        } else {
            Normalizer::uncached()
        };
        Self {
            config,
            aliases: AliasRegistry::new(),
            normalizer,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Save a criterion under its alias, replacing any previous one
    pub fn save_criterion(&self, criterion: Criterion) -> Result<()> {
        self.aliases.save(criterion)
    }

    /// Save several criteria; stops at the first one without an alias
    pub fn save_criteria<I>(&self, criteria: I) -> Result<()>
    where
        I: IntoIterator<Item = Criterion>,
    {
        criteria
            .into_iter()
            .try_for_each(|criterion| self.aliases.save(criterion))
    }

    pub fn remove_alias(&self, alias: &str) -> bool {
        self.aliases.remove(alias).is_some()
    }

    pub fn clear_aliases(&self) {
        self.aliases.clear();
    }

    /// Evaluate an expression against one record.
    ///
    /// The result has the same level as the expression.
    pub async fn evaluate(&self, record: &Value, expression: &Expression) -> Result<MatchResult> {
        self.evaluate_with_context(record, expression, &Value::Undefined)
            .await
    }

    /// Evaluate with a caller context handed to every callback
    pub async fn evaluate_with_context(
        &self,
        record: &Value,
        expression: &Expression,
        context: &Value,
    ) -> Result<MatchResult> {
        let plan = self.plan(expression)?;
        let result = self.evaluate_group(record, &plan.group, context).await;
        Ok(plan.unwrap(result))
    }

    /// Parse a JSON expression and evaluate it
    pub async fn evaluate_json(
        &self,
        record: &Value,
        raw: &serde_json::Value,
    ) -> Result<MatchResult> {
        let expression = schema::parse_expression(raw)?;
        self.evaluate(record, &expression).await
    }

    /// Number of criteria in non-empty filters
    pub fn count_active_filters(&self, expression: &Expression) -> usize {
        expression.count_active_filters()
    }

    pub fn is_empty(&self, expression: &Expression) -> bool {
        expression.is_empty()
    }

    /// Check that every alias resolves and every override is valid
    pub fn validate(&self, expression: &Expression) -> Result<()> {
        self.plan(expression).map(|_| ())
    }

    /// Validate a JSON expression without raising
    pub fn validate_expression(&self, raw: &serde_json::Value) -> ValidationReport {
        let outcome =
            schema::parse_expression(raw).and_then(|expression| self.validate(&expression));
        match outcome {
            Ok(()) => ValidationReport {
                valid: true,
                error: None,
            },
            Err(err) => ValidationReport {
                valid: false,
                error: Some(err.to_string()),
            },
        }
    }

    /// Human-readable summary of the operator vocabulary and saved aliases
    pub fn inspect(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Operators:");
        for criterion_type in CriterionType::ALL {
            let names = criterion_type.operator_names();
            if names.is_empty() {
                let _ = writeln!(out, "  {}: <predicate>", criterion_type);
            } else {
                let _ = writeln!(out, "  {}: {}", criterion_type, names.join(", "));
            }
        }

        let names = self.aliases.names();
        let _ = writeln!(out, "Aliases ({}):", names.len());
        for name in names {
            if let Some(criterion) = self.aliases.get(&name) {
                let path = if criterion.value_path.is_empty() {
                    "<record>".to_string()
                } else {
                    criterion.value_path.join(".")
                };
                let _ = writeln!(
                    out,
                    "  {}: {} at {} against {}",
                    name,
                    criterion.describe(),
                    path,
                    criterion.match_value.describe()
                );
            }
        }
        let _ = write!(
            out,
            "Normalizer cache: {} entries",
            self.normalizer.cached_len()
        );
        out
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::AliasRef;
    use crate::operator::NumberOperator;
    use serde_json::json;

    #[test]
    fn test_validate_expression() -> anyhow::Result<()> {
        let engine = FilterEngine::new();
        let report = engine.validate_expression(&json!({"alias": "adults"}));
        assert!(!report.valid);
        assert_eq!(report.error.as_deref(), Some("Alias not found: adults"));

        engine.save_criterion(
            Criterion::new(NumberOperator::GreaterOrEquals, 18)
                .path("age")
                .alias("adults"),
        )?;
        assert!(engine.validate_expression(&json!({"alias": "adults"})).valid);

        let report = engine.validate_expression(&json!({"alias": "adults", "operator": "CONTAINS"}));
        assert_eq!(
            report.error.as_deref(),
            Some("Unknown NUMBER operator: CONTAINS")
        );
        assert!(engine
            .validate(&Expression::from(AliasRef::new("adults").operator("LESS")))
            .is_ok());
        Ok(())
    }

    #[test]
    fn test_alias_management() -> anyhow::Result<()> {
        let engine = FilterEngine::new();
        engine.save_criteria(vec![
            Criterion::new(NumberOperator::Less, 1).alias("a"),
            Criterion::new(NumberOperator::Less, 2).alias("b"),
        ])?;
        assert_eq!(engine.aliases().len(), 2);
        assert!(engine.remove_alias("a"));
        assert!(!engine.remove_alias("a"));

        let inspect = engine.inspect();
        assert!(inspect.contains("NUMBER: EQUALS"));
        assert!(inspect.contains("Aliases (1):"));
        assert!(inspect.contains("b: NUMBER:LESS at <record> against 2"));

        engine.clear_aliases();
        assert!(engine.aliases().is_empty());
        Ok(())
    }

    #[test]
    fn test_config_controls_cache() {
        let engine = FilterEngine::with_config(EngineConfig {
            concurrency: Some(2),
            cache_normalized_text: false,
        });
        engine.normalizer().text("Hello World");
        assert_eq!(engine.normalizer().cached_len(), 0);
        assert_eq!(engine.config().concurrency, Some(2));
    }
}
