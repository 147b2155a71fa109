//! Structured boolean filter expressions over JSON-like records.
//!
//! Expressions come in three levels (criterion, filter, filter group),
//! are evaluated asynchronously, and explain every verdict with a result
//! tree mirroring the expression.

pub mod alias;
pub mod builder;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod error;
pub mod expression;
pub mod normalize;
pub mod operator;
pub mod path;
pub mod result;
pub mod schema;
pub mod value;

pub use alias::AliasRegistry;
pub use builder::FilterBuilder;
pub use config::EngineConfig;
pub use criteria::{AliasRef, Callback, Criterion, CriterionKind, CriterionNode, MatchValue};
pub use engine::{FilterEngine, ValidationReport};
pub use error::{FilterError, Result};
pub use expression::{Expression, Filter, FilterGroup, Level, LogicalOperator};
pub use operator::CriterionType;
pub use result::{CriteriaResult, FilterGroupResult, FilterResult, MatchResult};
pub use value::Value;
