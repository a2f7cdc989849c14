//! Storage trait definitions

use crate::analysis::AnalyzedString;
use crate::query::RecordPredicate;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    /// A record with the same identity hash (and therefore the same
    /// original string) is already stored.
    #[error("Record already exists: {0}")]
    Duplicate(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Repository of analyzed strings
///
/// Implementations must be thread-safe (Send + Sync) and must enforce at most
/// one record per original string inside `insert` itself, so that concurrent
/// duplicate submissions cannot both succeed.
pub trait RecordStore: Send + Sync {
    /// Insert a new record, failing with `StorageError::Duplicate` if one with
    /// the same identity already exists
    fn insert(&self, record: &AnalyzedString) -> StorageResult<()>;

    /// Exact lookup by original string
    fn find_by_value(&self, value: &str) -> StorageResult<Option<AnalyzedString>>;

    /// Lookup by identity hash
    fn find_by_id(&self, id: &str) -> StorageResult<Option<AnalyzedString>>;

    /// All records matching the predicate, oldest first
    fn search(&self, predicate: &RecordPredicate) -> StorageResult<Vec<AnalyzedString>>;

    /// Delete by original string; returns whether a record was removed
    fn delete_by_value(&self, value: &str) -> StorageResult<bool>;

    /// Number of stored records
    fn count(&self) -> StorageResult<usize>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: RecordStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
