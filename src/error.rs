//! Error types for expression validation and alias resolution.
//!
//! Only structural problems surface as errors. Anything that goes wrong
//! while a single criterion is evaluated is folded into a failed
//! `CriteriaResult` instead.

use thiserror::Error;

/// Errors raised before evaluation starts.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid expression at {path}: {message}")]
    Validation { path: String, message: String },

    #[error("Unknown {kind} operator: {operator}")]
    UnknownOperator { kind: String, operator: String },

    #[error("Alias not found: {alias}")]
    AliasNotFound { alias: String },

    #[error("Cannot save a criterion without an alias")]
    MissingAlias,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    /// Create a validation error for the node at `path`
    pub fn validation(path: impl Into<String>, message: impl Into<String>) -> Self {
        FilterError::Validation {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for validation and resolution.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::validation("filters[0].criteria[1]", "missing operator");
        assert_eq!(
            err.to_string(),
            "Invalid expression at filters[0].criteria[1]: missing operator"
        );

        let err = FilterError::UnknownOperator {
            kind: "NUMBER".to_string(),
            operator: "CONTAINS".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown NUMBER operator: CONTAINS");

        let err = FilterError::AliasNotFound {
            alias: "adults".to_string(),
        };
        assert_eq!(err.to_string(), "Alias not found: adults");

        assert_eq!(
            FilterError::MissingAlias.to_string(),
            "Cannot save a criterion without an alias"
        );
    }
}
