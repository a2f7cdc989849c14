//! Storage backends for analyzed strings
//!
//! Every backend implements `RecordStore`. `SqliteStore` is the persistent
//! implementation; `MemoryStore` serves tests and throwaway sessions.

mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{OpenStore, RecordStore, StorageError, StorageResult};
