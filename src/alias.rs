//! Registry of named, reusable criteria.

use crate::criteria::{AliasRef, Criterion, CriterionKind};
use crate::error::{FilterError, Result};
use crate::operator::CriterionType;
use crate::value::Value;
use log::info;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Saved criteria keyed by alias
#[derive(Debug, Default)]
pub struct AliasRegistry {
    entries: RwLock<HashMap<String, Criterion>>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a criterion under its alias, replacing any previous entry
    pub fn save(&self, criterion: Criterion) -> Result<()> {
        let alias = match criterion.alias.as_deref() {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => return Err(FilterError::MissingAlias),
        };
        let replaced = self.entries.write().insert(alias.clone(), criterion).is_some();
        if replaced {
            info!("Replaced saved criterion '{}'", alias);
        } else {
            info!("Saved criterion '{}'", alias);
        }
        Ok(())
    }

    pub fn get(&self, alias: &str) -> Option<Criterion> {
        self.entries.read().get(alias).cloned()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.entries.read().contains_key(alias)
    }

    pub fn remove(&self, alias: &str) -> Option<Criterion> {
        self.entries.write().remove(alias)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Saved aliases in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Produce the effective criterion for a reference.
    ///
    /// The saved entry is cloned, never modified.
    pub fn resolve(&self, reference: &AliasRef) -> Result<Criterion> {
        let saved = self
            .get(&reference.alias)
            .ok_or_else(|| FilterError::AliasNotFound {
                alias: reference.alias.clone(),
            })?;
        apply_overrides(saved, reference)
    }
}

fn apply_overrides(mut criterion: Criterion, reference: &AliasRef) -> Result<Criterion> {
    let saved_type = criterion.criterion_type();
    let target_type = reference.criterion_type.unwrap_or(saved_type);

    if target_type != saved_type {
        // Defaults of the saved type do not carry over
        criterion.default_value = Value::Undefined;
    }

    if target_type != saved_type || reference.operator.is_some() {
        let operator = reference
            .operator
            .as_deref()
            .unwrap_or_else(|| criterion.kind.operator_name());
        criterion.kind = match (&criterion.kind, target_type) {
            (CriterionKind::Custom(_), CriterionType::Custom) => {
                return Err(FilterError::validation(
                    format!("alias {}", reference.alias),
                    "CUSTOM criteria have no operators to override",
                ))
            }
            _ => CriterionKind::parse(target_type, operator)?,
        };
    }

    if let Some(match_value) = &reference.match_value {
        criterion.match_value = match_value.clone();
    }
    if let Some(path) = &reference.value_path {
        criterion.value_path = path.clone();
    }
    if let Some(normalize) = reference.normalize {
        criterion.normalize = normalize;
    }
    if let Some(match_in_array) = reference.match_in_array {
        criterion.match_in_array = match_in_array;
    }
    if let Some(mapper) = &reference.criteria_mapper {
        criterion.criteria_mapper = Some(mapper.clone());
    }
    if let Some(mapper) = &reference.value_mapper {
        criterion.value_mapper = Some(mapper.clone());
    }
    Ok(criterion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::MatchValue;
    use crate::operator::NumberOperator;

    fn adults() -> Criterion {
        Criterion::new(NumberOperator::GreaterOrEquals, 18)
            .path("age")
            .default_value(0)
            .alias("adults")
    }

    #[test]
    fn test_save_requires_alias() {
        let registry = AliasRegistry::new();
        let err = registry
            .save(Criterion::new(NumberOperator::Less, 1))
            .unwrap_err();
        assert!(matches!(err, FilterError::MissingAlias));
        assert!(registry.save(Criterion::new(NumberOperator::Less, 1).alias("")).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_save_overwrites() -> anyhow::Result<()> {
        let registry = AliasRegistry::new();
        registry.save(adults())?;
        registry.save(adults().path("years"))?;
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("adults").map(|c| c.value_path), Some(vec!["years".to_string()]));
        Ok(())
    }

    #[test]
    fn test_resolve_with_overrides() -> anyhow::Result<()> {
        let registry = AliasRegistry::new();
        registry.save(adults())?;

        let resolved = registry.resolve(&AliasRef::new("adults").operator("LESS").match_value(65))?;
        assert_eq!(resolved.describe(), "NUMBER:LESS");
        assert!(matches!(resolved.match_value, MatchValue::Literal(Value::Number(n)) if n == 65.0));
        assert_eq!(resolved.value_path, vec!["age".to_string()]);

        // The saved entry is untouched
        let saved = registry.get("adults").map(|c| c.describe());
        assert_eq!(saved.as_deref(), Some("NUMBER:GREATER-OR-EQUALS"));
        Ok(())
    }

    #[test]
    fn test_type_override_revalidates() -> anyhow::Result<()> {
        let registry = AliasRegistry::new();
        registry.save(adults())?;

        // GREATER-OR-EQUALS is not a STRING operator
        let err = registry
            .resolve(&AliasRef::new("adults").criterion_type(CriterionType::String))
            .unwrap_err();
        assert!(matches!(err, FilterError::UnknownOperator { .. }));

        let resolved = registry.resolve(
            &AliasRef::new("adults")
                .criterion_type(CriterionType::String)
                .operator("CONTAINS"),
        )?;
        assert_eq!(resolved.describe(), "STRING:CONTAINS");
        assert!(resolved.default_value.is_undefined());
        Ok(())
    }

    #[test]
    fn test_missing_alias() {
        let registry = AliasRegistry::new();
        let err = registry.resolve(&AliasRef::new("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Alias not found: nope");
    }

    #[test]
    fn test_remove_and_clear() -> anyhow::Result<()> {
        let registry = AliasRegistry::new();
        registry.save(adults())?;
        registry.save(adults().alias("grown-ups"))?;
        assert_eq!(registry.names(), vec!["adults".to_string(), "grown-ups".to_string()]);
        assert!(registry.remove("adults").is_some());
        assert!(!registry.contains("adults"));
        registry.clear();
        assert!(registry.is_empty());
        Ok(())
    }
}
