//! Engine configuration and file loaders.

use crate::criteria::Criterion;
use crate::error::{FilterError, Result};
use crate::expression::Expression;
use crate::schema;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Default number of records evaluated at once; `None` is unbounded
    pub concurrency: Option<usize>,
    /// Memoize normalized strings
    pub cache_normalized_text: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: None,
            cache_normalized_text: true,
        }
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load an [`EngineConfig`] from a JSON file
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load records from a JSON array or from newline-delimited JSON
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let text = std::fs::read_to_string(path)?;
    let trimmed = text.trim_start();

    if trimmed.starts_with('[') {
        let records: Vec<serde_json::Value> = serde_json::from_str(trimmed)?;
        return Ok(records.into_iter().map(Value::from).collect());
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line)
                .map(Value::from)
                .map_err(FilterError::from)
        })
        .collect()
}

/// Load an expression at any level
pub fn load_expression(path: impl AsRef<Path>) -> Result<Expression> {
    schema::parse_expression(&read_json(path.as_ref())?)
}

/// Load a JSON array of criteria, each carrying an alias
pub fn load_aliases(path: impl AsRef<Path>) -> Result<Vec<Criterion>> {
    let raw = read_json(path.as_ref())?;
    let Some(items) = raw.as_array() else {
        return Err(FilterError::validation("$", "aliases file must hold an array"));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let criterion = schema::parse_criterion(item)?;
            if criterion.alias.is_none() {
                return Err(FilterError::validation(format!("$[{}]", i), "missing alias"));
            }
            Ok(criterion)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");

        fs::write(&path, "{}")?;
        assert_eq!(load_config(&path)?, EngineConfig::default());

        fs::write(&path, r#"{"concurrency": 4, "cacheNormalizedText": false}"#)?;
        let config = load_config(&path)?;
        assert_eq!(config.concurrency, Some(4));
        assert!(!config.cache_normalized_text);

        fs::write(&path, r#"{"workers": 4}"#)?;
        assert!(load_config(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_load_records() -> anyhow::Result<()> {
        let dir = tempdir()?;

        let array = dir.path().join("records.json");
        fs::write(&array, r#"[{"id": 1}, {"id": 2}]"#)?;
        assert_eq!(load_records(&array)?.len(), 2);

        let ndjson = dir.path().join("records.ndjson");
        fs::write(&ndjson, "{\"id\": 1}\n\n{\"id\": 2}\n{\"id\": 3}\n")?;
        let records = load_records(&ndjson)?;
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].get("id"), Some(&Value::Number(3.0)));

        fs::write(&ndjson, "{\"id\": 1}\nnot json\n")?;
        assert!(matches!(load_records(&ndjson), Err(FilterError::Json(_))));

        assert!(matches!(
            load_records(dir.path().join("missing.json")),
            Err(FilterError::Io(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_expression_and_aliases() -> anyhow::Result<()> {
        let dir = tempdir()?;

        let expr = dir.path().join("expr.json");
        fs::write(
            &expr,
            r#"{"criteria": [{"type": "NUMBER", "operator": "LESS", "valuePath": "age", "matchValue": 30}]}"#,
        )?;
        assert_eq!(load_expression(&expr)?.count_active_filters(), 1);

        let aliases = dir.path().join("aliases.json");
        fs::write(
            &aliases,
            r#"[{"alias": "adults", "type": "NUMBER", "operator": "GREATER-OR-EQUALS", "valuePath": "age", "matchValue": 18}]"#,
        )?;
        let saved = load_aliases(&aliases)?;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].alias.as_deref(), Some("adults"));

        fs::write(&aliases, r#"[{"type": "NUMBER", "operator": "LESS"}]"#)?;
        assert!(load_aliases(&aliases).is_err());
        Ok(())
    }
}
