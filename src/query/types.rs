//! Query error and echo types

use super::criteria::FilterCriteria;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while building filter criteria
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unable to parse natural language query")]
    Unparseable,

    #[error("Query parsed but resulted in conflicting filters: {0}")]
    ConflictingFilters(String),

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Result type for query construction
pub type QueryResult<T> = Result<T, QueryError>;

/// How a natural-language query was understood. Echoed back, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretedQuery {
    pub original: String,
    pub parsed_filters: FilterCriteria,
}

impl InterpretedQuery {
    pub fn new(original: impl Into<String>, parsed_filters: FilterCriteria) -> Self {
        Self {
            original: original.into(),
            parsed_filters,
        }
    }
}
