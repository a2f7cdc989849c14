//! Structured filter criteria

use super::types::{QueryError, QueryResult};
use serde::{Deserialize, Serialize};

/// Structured filter over analyzed strings.
///
/// Every field is optional; an absent field imposes no constraint. Produced
/// either from validated request parameters or by the natural-language
/// parser, and consumed only by [`translate`](super::translate).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_palindrome: Option<bool>,
    /// Inclusive lower bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Inclusive upper bound on length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Case-insensitive single-character containment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains_character: Option<char>,
}

impl FilterCriteria {
    /// Criteria that match every record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palindrome(mut self, is_palindrome: bool) -> Self {
        self.is_palindrome = Some(is_palindrome);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = Some(word_count);
        self
    }

    pub fn with_character(mut self, c: char) -> Self {
        self.contains_character = Some(c);
        self
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.is_palindrome.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.word_count.is_none()
            && self.contains_character.is_none()
    }

    /// Reject criteria whose length bounds cannot both hold.
    pub fn check_consistency(&self) -> QueryResult<()> {
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(QueryError::ConflictingFilters(format!(
                    "min_length ({}) cannot be greater than max_length ({})",
                    min, max
                )));
            }
        }
        Ok(())
    }
}
