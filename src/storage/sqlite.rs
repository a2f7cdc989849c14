//! SQLite storage backend

use super::traits::{OpenStore, RecordStore, StorageError, StorageResult};
use crate::analysis::{AnalyzedString, FrequencyMap, StringProperties};
use crate::query::{case_variants, Condition, RecordPredicate};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const SELECT_COLUMNS: &str = "SELECT identity_hash, original_string, length, is_palindrome,
        unique_characters, word_count, character_frequency_json, created_at
     FROM analyzed_strings";

const ORDER: &str = " ORDER BY created_at, identity_hash";

/// Raw column values of one `analyzed_strings` row
type RawRow = (String, String, i64, bool, i64, i64, String, String);

/// SQLite-backed record store
///
/// One table, `analyzed_strings`, keyed by identity hash with a second UNIQUE
/// constraint on the original string. Those constraints are what guarantees
/// a single record per string; callers' existence checks are advisory.
/// Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS analyzed_strings (
                identity_hash TEXT PRIMARY KEY,
                original_string TEXT NOT NULL UNIQUE,
                length INTEGER NOT NULL,
                is_palindrome INTEGER NOT NULL,
                unique_characters INTEGER NOT NULL,
                word_count INTEGER NOT NULL,
                character_frequency_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_strings_length
                ON analyzed_strings(length);
            CREATE INDEX IF NOT EXISTS idx_strings_palindrome
                ON analyzed_strings(is_palindrome);
            CREATE INDEX IF NOT EXISTS idx_strings_word_count
                ON analyzed_strings(word_count);

            -- Concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        tracing::debug!("analyzed_strings schema ready");
        Ok(())
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Fixed-width RFC 3339 so that text order is chronological order.
    fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn row_to_record(row: RawRow) -> StorageResult<AnalyzedString> {
        let (hash, original, length, is_palindrome, unique, words, frequency_json, created_at) = row;
        let character_frequency_map: FrequencyMap = serde_json::from_str(&frequency_json)?;

        Ok(AnalyzedString {
            original_string: original,
            properties: StringProperties {
                length: length as usize,
                is_palindrome,
                unique_characters: unique as usize,
                word_count: words as usize,
                sha256_hash: hash,
                character_frequency_map,
            },
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StorageError::DateParse(e.to_string()))?
                .with_timezone(&Utc),
        })
    }

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
        ))
    }

    fn find_one(&self, column: &str, key: &str) -> StorageResult<Option<AnalyzedString>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                &format!("{} WHERE {} = ?1", SELECT_COLUMNS, column),
                params![key],
                Self::read_row,
            )
            .optional()?;

        row.map(Self::row_to_record).transpose()
    }
}

/// Push a bound value and return its positional placeholder.
fn bind(values: &mut Vec<Value>, value: Value) -> String {
    values.push(value);
    format!("?{}", values.len())
}

const MATCH_NOTHING: &str = "0 = 1";

/// SQLite integer for a count, or `None` when it exceeds `i64::MAX`.
fn integer(n: usize) -> Option<Value> {
    i64::try_from(n).ok().map(Value::Integer)
}

/// Render a predicate as a parameterized WHERE clause.
///
/// Returns an empty clause for an unconstrained predicate.
fn where_clause(predicate: &RecordPredicate) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for condition in predicate.conditions() {
        match *condition {
            Condition::IsPalindrome(expected) => {
                let p = bind(&mut values, Value::Integer(expected as i64));
                clauses.push(format!("is_palindrome = {}", p));
            }
            Condition::LengthRange { min, max } => {
                // Stored counts always fit in i64; a wider bound is
                // unsatisfiable as a minimum and vacuous as a maximum.
                if let Some(min) = min {
                    clauses.push(match integer(min) {
                        Some(v) => format!("length >= {}", bind(&mut values, v)),
                        None => MATCH_NOTHING.to_string(),
                    });
                }
                if let Some(v) = max.and_then(integer) {
                    let p = bind(&mut values, v);
                    clauses.push(format!("length <= {}", p));
                }
            }
            Condition::WordCount(expected) => {
                clauses.push(match integer(expected) {
                    Some(v) => format!("word_count = {}", bind(&mut values, v)),
                    None => MATCH_NOTHING.to_string(),
                });
            }
            Condition::ContainsCharacter(c) => {
                let (lower, upper) = case_variants(c);
                let lp = bind(&mut values, Value::Text(lower.to_string()));
                let up = bind(&mut values, Value::Text(upper.to_string()));
                clauses.push(format!(
                    "(instr(original_string, {}) > 0 OR instr(original_string, {}) > 0)",
                    lp, up
                ));
            }
        }
    }

    if clauses.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", clauses.join(" AND ")), values)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.as_ref().display(), "opening sqlite store");
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl RecordStore for SqliteStore {
    fn insert(&self, record: &AnalyzedString) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let frequency_json = serde_json::to_string(&record.properties.character_frequency_map)?;

        let result = conn.execute(
            r#"
            INSERT INTO analyzed_strings (identity_hash, original_string, length, is_palindrome,
                                          unique_characters, word_count, character_frequency_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                record.identity_hash(),
                record.original_string,
                record.length() as i64,
                record.is_palindrome(),
                record.properties.unique_characters as i64,
                record.word_count() as i64,
                frequency_json,
                Self::format_timestamp(&record.created_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::Duplicate(record.identity_hash().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_value(&self, value: &str) -> StorageResult<Option<AnalyzedString>> {
        self.find_one("original_string", value)
    }

    fn find_by_id(&self, id: &str) -> StorageResult<Option<AnalyzedString>> {
        self.find_one("identity_hash", id)
    }

    fn search(&self, predicate: &RecordPredicate) -> StorageResult<Vec<AnalyzedString>> {
        let (clause, values) = where_clause(predicate);
        let sql = format!("{}{}{}", SELECT_COLUMNS, clause, ORDER);

        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), Self::read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    fn delete_by_value(&self, value: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute(
            "DELETE FROM analyzed_strings WHERE original_string = ?1",
            params![value],
        )?;
        Ok(rows > 0)
    }

    fn count(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM analyzed_strings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{translate, FilterCriteria};
    use chrono::TimeZone;

    fn create_test_store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    fn record_at(value: &str, second: u32) -> AnalyzedString {
        AnalyzedString::with_timestamp(value, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, second).unwrap())
    }

    fn seed(store: &SqliteStore) {
        for (i, value) in ["racecar", "hello world", "A man a plan a canal Panama", "noon", "xyz"]
            .iter()
            .enumerate()
        {
            store.insert(&record_at(value, i as u32)).unwrap();
        }
    }

    fn values(records: &[AnalyzedString]) -> Vec<&str> {
        records.iter().map(|r| r.original_string.as_str()).collect()
    }

    #[test]
    fn test_insert_and_find_by_value() {
        let store = create_test_store();
        let record = AnalyzedString::new("Hello, World!");
        store.insert(&record).unwrap();

        let loaded = store.find_by_value("Hello, World!").unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(store.find_by_value("hello, world!").unwrap().is_none());
    }

    #[test]
    fn test_find_by_id() {
        let store = create_test_store();
        let record = AnalyzedString::new("abc");
        store.insert(&record).unwrap();

        let loaded = store.find_by_id(record.identity_hash()).unwrap().unwrap();
        assert_eq!(loaded.original_string, "abc");
        assert!(store.find_by_id("not-a-hash").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let store = create_test_store();
        let first = record_at("twice", 1);
        store.insert(&first).unwrap();

        let err = store.insert(&record_at("twice", 2)).unwrap_err();
        assert!(matches!(err, StorageError::Duplicate(ref id) if id == first.identity_hash()));

        // Original row untouched
        assert_eq!(store.find_by_value("twice").unwrap().unwrap(), first);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_frequency_map_round_trip() {
        let store = create_test_store();
        let record = AnalyzedString::new("ünïcode \"quotes\" and\ttabs");
        store.insert(&record).unwrap();

        let loaded = store.find_by_value(&record.original_string).unwrap().unwrap();
        assert_eq!(
            loaded.properties.character_frequency_map,
            record.properties.character_frequency_map
        );
    }

    #[test]
    fn test_search_unconstrained_returns_all_in_creation_order() {
        let store = create_test_store();
        seed(&store);

        let all = store.search(&RecordPredicate::all()).unwrap();
        assert_eq!(
            values(&all),
            vec!["racecar", "hello world", "A man a plan a canal Panama", "noon", "xyz"]
        );
    }

    #[test]
    fn test_search_palindrome_and_length() {
        let store = create_test_store();
        seed(&store);

        let predicate = translate(&FilterCriteria::new().with_palindrome(true).with_min_length(5));
        let found = store.search(&predicate).unwrap();
        assert_eq!(values(&found), vec!["racecar", "A man a plan a canal Panama"]);
    }

    #[test]
    fn test_search_length_range_inclusive() {
        let store = create_test_store();
        seed(&store);

        let predicate = translate(&FilterCriteria::new().with_min_length(3).with_max_length(4));
        let found = store.search(&predicate).unwrap();
        assert_eq!(values(&found), vec!["noon", "xyz"]);
    }

    #[test]
    fn test_search_word_count() {
        let store = create_test_store();
        seed(&store);

        let predicate = translate(&FilterCriteria::new().with_word_count(2));
        assert_eq!(values(&store.search(&predicate).unwrap()), vec!["hello world"]);
    }

    #[test]
    fn test_search_character_ignores_case() {
        let store = create_test_store();
        seed(&store);

        let predicate = translate(&FilterCriteria::new().with_character('p'));
        assert_eq!(
            values(&store.search(&predicate).unwrap()),
            vec!["A man a plan a canal Panama"]
        );

        let upper = translate(&FilterCriteria::new().with_character('R'));
        assert_eq!(values(&store.search(&upper).unwrap()), vec!["racecar", "hello world"]);
    }

    #[test]
    fn test_search_character_is_not_a_pattern() {
        let store = create_test_store();
        seed(&store);

        for needle in ['%', '_', '.'] {
            let predicate = translate(&FilterCriteria::new().with_character(needle));
            assert!(store.search(&predicate).unwrap().is_empty(), "{}", needle);
        }
    }

    #[test]
    fn test_delete_by_value() {
        let store = create_test_store();
        seed(&store);

        assert!(store.delete_by_value("noon").unwrap());
        assert!(!store.delete_by_value("noon").unwrap());
        assert!(store.find_by_value("noon").unwrap().is_none());
        assert_eq!(store.count().unwrap(), 4);
    }

    #[test]
    fn test_where_clause_numbering() {
        let predicate = translate(
            &FilterCriteria::new()
                .with_palindrome(true)
                .with_min_length(2)
                .with_max_length(8)
                .with_character('a'),
        );
        let (clause, values) = where_clause(&predicate);
        assert_eq!(
            clause,
            " WHERE is_palindrome = ?1 AND length >= ?2 AND length <= ?3 AND \
             (instr(original_string, ?4) > 0 OR instr(original_string, ?5) > 0)"
        );
        assert_eq!(values.len(), 5);
    }

    #[test]
    fn test_bounds_beyond_i64_range() {
        let store = create_test_store();
        seed(&store);

        let too_long = translate(&FilterCriteria::new().with_min_length(usize::MAX));
        assert!(store.search(&too_long).unwrap().is_empty());

        let too_many_words = translate(&FilterCriteria::new().with_word_count(usize::MAX));
        assert!(store.search(&too_many_words).unwrap().is_empty());

        let any_length = translate(&FilterCriteria::new().with_max_length(usize::MAX));
        assert_eq!(store.search(&any_length).unwrap().len(), 5);
    }

    #[test]
    fn test_records_persist_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("strings.db");

        let record = AnalyzedString::new("persistent");
        {
            let store = SqliteStore::open(&db_path).unwrap();
            store.insert(&record).unwrap();
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        assert_eq!(reopened.find_by_value("persistent").unwrap().unwrap(), record);
    }

    #[test]
    fn test_wal_mode_enabled_at_connection() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test-wal.db");
        let store = SqliteStore::open(&db_path).unwrap();

        let journal_mode: String = store
            .conn
            .lock()
            .unwrap()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();

        assert_eq!(journal_mode, "wal");
    }
}
