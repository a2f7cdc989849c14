//! Analyzed string records and their public views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-character occurrence counts, ordered by character.
pub type FrequencyMap = BTreeMap<char, usize>;

/// Properties derived from a raw string.
///
/// Every field is a deterministic function of the input; see
/// [`compute_properties`](super::compute_properties).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringProperties {
    /// Number of characters (Unicode scalar values)
    pub length: usize,
    /// Whether the alphanumeric-normalized string reads the same reversed
    pub is_palindrome: bool,
    /// Number of distinct characters, case-sensitive
    pub unique_characters: usize,
    /// Number of whitespace-delimited tokens
    pub word_count: usize,
    /// Lowercase hex SHA-256 of the raw bytes
    pub sha256_hash: String,
    /// Occurrence count of every character in the raw string
    pub character_frequency_map: FrequencyMap,
}

/// A persisted string together with its derived properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedString {
    pub original_string: String,
    pub properties: StringProperties,
    pub created_at: DateTime<Utc>,
}

impl AnalyzedString {
    /// Analyze `value` and stamp the record with the current time.
    pub fn new(value: impl Into<String>) -> Self {
        Self::with_timestamp(value, Utc::now())
    }

    /// Analyze `value` with an explicit creation time.
    pub fn with_timestamp(value: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let original_string = value.into();
        let properties = super::compute_properties(&original_string);
        Self {
            original_string,
            properties,
            created_at,
        }
    }

    /// The identity hash, which doubles as the public id.
    pub fn identity_hash(&self) -> &str {
        &self.properties.sha256_hash
    }

    pub fn length(&self) -> usize {
        self.properties.length
    }

    pub fn is_palindrome(&self) -> bool {
        self.properties.is_palindrome
    }

    pub fn word_count(&self) -> usize {
        self.properties.word_count
    }

    /// Public representation returned to callers.
    pub fn to_view(&self) -> RecordView {
        RecordView {
            id: self.identity_hash().to_string(),
            value: self.original_string.clone(),
            properties: self.properties.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

/// Wire shape of a stored record: `{id, value, properties, created_at}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: String,
    pub value: String,
    pub properties: StringProperties,
    pub created_at: String,
}
