//! Strand: string analysis with structured and natural-language filtering
//!
//! Strings are analyzed once on submission (length, palindrome status,
//! character statistics, SHA-256 identity) and stored. They can then be
//! listed through structured filters or through free text that is
//! translated into the same filters.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use strand::{AnalysisService, MemoryStore};
//!
//! let service = AnalysisService::new(Arc::new(MemoryStore::new()));
//! service.create("racecar").unwrap();
//!
//! let found = service.list_by_natural_language("single word palindromes").unwrap();
//! assert_eq!(found.count, 1);
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod logging;
pub mod mcp;
pub mod query;
pub mod storage;

pub use analysis::{compute_properties, AnalyzedString, RecordView, StringProperties};
pub use api::{AnalysisError, AnalysisResult, AnalysisService, FilteredList, InterpretedList};
pub use config::{open_store, ConfigError, StrandConfig};
pub use query::{
    parse_natural_language, translate, FilterCriteria, FilterParams, InterpretedQuery,
    QueryError, RecordPredicate,
};
pub use storage::{MemoryStore, OpenStore, RecordStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
