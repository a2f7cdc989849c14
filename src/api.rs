//! Transport-independent service layer.
//!
//! `AnalysisService` is the single entry point for consumer-facing
//! operations. Transports (CLI, MCP, direct embedding) call its methods and
//! never reach into the stores or the query machinery directly.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{AnalyzedString, RecordView};
use crate::query::{
    self, parse_natural_language, FilterCriteria, InterpretedQuery, QueryError,
};
use crate::storage::{RecordStore, StorageError};

/// Errors surfaced to callers of the service.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("String '{0}' already exists")]
    Conflict(String),

    #[error("String '{0}' not found")]
    NotFound(String),

    #[error("Unable to parse natural language query")]
    UnparseableQuery,

    #[error("Query parsed but resulted in conflicting filters: {0}")]
    ConflictingFilters(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl AnalysisError {
    /// HTTP-style status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            AnalysisError::Validation(_) | AnalysisError::UnparseableQuery => 400,
            AnalysisError::NotFound(_) => 404,
            AnalysisError::Conflict(_) => 409,
            AnalysisError::ConflictingFilters(_) => 422,
            AnalysisError::Storage(_) => 500,
        }
    }
}

impl From<QueryError> for AnalysisError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Unparseable => AnalysisError::UnparseableQuery,
            QueryError::ConflictingFilters(reason) => AnalysisError::ConflictingFilters(reason),
            QueryError::InvalidParameter { .. } => AnalysisError::Validation(err.to_string()),
        }
    }
}

impl From<StorageError> for AnalysisError {
    fn from(err: StorageError) -> Self {
        AnalysisError::Storage(err)
    }
}

/// Result type for service operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Response of a structured-filter listing
#[derive(Debug, Clone, Serialize)]
pub struct FilteredList {
    pub data: Vec<RecordView>,
    pub count: usize,
    pub filters_applied: FilterCriteria,
}

/// Response of a natural-language listing
#[derive(Debug, Clone, Serialize)]
pub struct InterpretedList {
    pub data: Vec<RecordView>,
    pub count: usize,
    pub interpreted_query: InterpretedQuery,
}

/// Orchestrates analysis, querying and persistence.
#[derive(Clone)]
pub struct AnalysisService {
    store: Arc<dyn RecordStore>,
}

impl AnalysisService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // --- Write ---

    /// Analyze and persist a new string.
    ///
    /// The existence check only saves work; the store's uniqueness
    /// constraint decides, and a duplicate reported by the store is a
    /// conflict as well.
    pub fn create(&self, value: &str) -> AnalysisResult<RecordView> {
        if self.store.find_by_value(value)?.is_some() {
            tracing::debug!(value, "create rejected: already stored");
            return Err(AnalysisError::Conflict(value.to_string()));
        }

        let record = AnalyzedString::new(value);
        match self.store.insert(&record) {
            Ok(()) => {}
            Err(StorageError::Duplicate(_)) => {
                tracing::debug!(value, "create lost a race with a concurrent insert");
                return Err(AnalysisError::Conflict(value.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(id = record.identity_hash(), length = record.length(), "string analyzed");
        Ok(record.to_view())
    }

    /// Delete by exact value.
    pub fn delete_by_value(&self, value: &str) -> AnalysisResult<()> {
        if !self.store.delete_by_value(value)? {
            return Err(AnalysisError::NotFound(value.to_string()));
        }
        tracing::info!(value, "string deleted");
        Ok(())
    }

    // --- Read ---

    /// Exact lookup by value.
    pub fn get_by_value(&self, value: &str) -> AnalysisResult<RecordView> {
        self.store
            .find_by_value(value)?
            .map(|r| r.to_view())
            .ok_or_else(|| AnalysisError::NotFound(value.to_string()))
    }

    /// Lookup by public id (the identity hash).
    pub fn get_by_id(&self, id: &str) -> AnalysisResult<RecordView> {
        self.store
            .find_by_id(id)?
            .map(|r| r.to_view())
            .ok_or_else(|| AnalysisError::NotFound(id.to_string()))
    }

    /// List records matching structured criteria.
    pub fn list_by_filter(&self, criteria: FilterCriteria) -> AnalysisResult<FilteredList> {
        criteria.check_consistency()?;
        let data = self.search(&criteria)?;

        Ok(FilteredList {
            count: data.len(),
            data,
            filters_applied: criteria,
        })
    }

    /// Interpret free text and list the matching records.
    pub fn list_by_natural_language(&self, text: &str) -> AnalysisResult<InterpretedList> {
        if text.trim().is_empty() {
            return Err(AnalysisError::Validation("query must not be empty".into()));
        }

        let criteria = parse_natural_language(text).map_err(|e| {
            tracing::debug!(text, error = %e, "natural-language query rejected");
            e
        })?;
        tracing::debug!(text, filters = ?criteria, "natural-language query interpreted");

        let data = self.search(&criteria)?;
        Ok(InterpretedList {
            count: data.len(),
            data,
            interpreted_query: InterpretedQuery::new(text, criteria),
        })
    }

    /// Number of stored strings.
    pub fn count(&self) -> AnalysisResult<usize> {
        Ok(self.store.count()?)
    }

    fn search(&self, criteria: &FilterCriteria) -> AnalysisResult<Vec<RecordView>> {
        let predicate = query::translate(criteria);
        let records = self.store.search(&predicate)?;
        tracing::debug!(conditions = predicate.conditions().len(), matched = records.len(), "search");
        Ok(records.iter().map(AnalyzedString::to_view).collect())
    }
}
