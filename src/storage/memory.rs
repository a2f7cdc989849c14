//! In-process record store

use super::traits::{RecordStore, StorageError, StorageResult};
use crate::analysis::{identity_hash, AnalyzedString};
use crate::query::RecordPredicate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Record store held entirely in memory, keyed by identity hash.
///
/// Uniqueness comes from the map's entry API: the vacant-entry insert holds
/// the shard lock, so two concurrent inserts of the same string cannot both
/// succeed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, AnalyzedString>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert(&self, record: &AnalyzedString) -> StorageResult<()> {
        match self.records.entry(record.identity_hash().to_string()) {
            Entry::Occupied(existing) => Err(StorageError::Duplicate(existing.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    fn find_by_value(&self, value: &str) -> StorageResult<Option<AnalyzedString>> {
        Ok(self
            .records
            .get(&identity_hash(value))
            .filter(|r| r.original_string == value)
            .map(|r| r.clone()))
    }

    fn find_by_id(&self, id: &str) -> StorageResult<Option<AnalyzedString>> {
        Ok(self.records.get(id).map(|r| r.clone()))
    }

    fn search(&self, predicate: &RecordPredicate) -> StorageResult<Vec<AnalyzedString>> {
        let mut found: Vec<AnalyzedString> = self
            .records
            .iter()
            .filter(|r| predicate.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();

        // Same order as the SQLite store
        found.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.identity_hash().cmp(b.identity_hash()))
        });
        Ok(found)
    }

    fn delete_by_value(&self, value: &str) -> StorageResult<bool> {
        Ok(self
            .records
            .remove_if(&identity_hash(value), |_, r| r.original_string == value)
            .is_some())
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{translate, FilterCriteria};
    use std::sync::Arc;

    #[test]
    fn test_insert_find_delete() {
        let store = MemoryStore::new();
        let record = AnalyzedString::new("level");
        store.insert(&record).unwrap();

        assert_eq!(store.find_by_value("level").unwrap(), Some(record.clone()));
        assert_eq!(store.find_by_id(record.identity_hash()).unwrap(), Some(record));
        assert!(store.delete_by_value("level").unwrap());
        assert!(!store.delete_by_value("level").unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let store = MemoryStore::new();
        let first = AnalyzedString::new("same");
        store.insert(&first).unwrap();

        assert!(matches!(
            store.insert(&AnalyzedString::new("same")),
            Err(StorageError::Duplicate(_))
        ));
        assert_eq!(store.find_by_value("same").unwrap(), Some(first));
    }

    #[test]
    fn test_search_applies_predicate() {
        let store = MemoryStore::new();
        for value in ["kayak", "kayaks", "a b", "Stats"] {
            store.insert(&AnalyzedString::new(value)).unwrap();
        }

        let predicate = translate(&FilterCriteria::new().with_palindrome(true));
        let mut found: Vec<String> = store
            .search(&predicate)
            .unwrap()
            .into_iter()
            .map(|r| r.original_string)
            .collect();
        found.sort();
        assert_eq!(found, vec!["Stats", "kayak"]);
    }

    #[test]
    fn test_concurrent_duplicate_inserts_admit_one() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert(&AnalyzedString::new("race")).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.count().unwrap(), 1);
    }
}
