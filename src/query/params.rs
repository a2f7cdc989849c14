//! Validation of untrusted filter parameters
//!
//! Transports hand over loosely typed values; `into_criteria` is the only way
//! they become [`FilterCriteria`].

use super::criteria::FilterCriteria;
use super::types::{QueryError, QueryResult};
use serde::Deserialize;

/// Raw structured-filter parameters as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FilterParams {
    pub is_palindrome: Option<bool>,
    pub min_length: Option<i64>,
    pub max_length: Option<i64>,
    pub word_count: Option<i64>,
    pub contains_character: Option<String>,
}

impl FilterParams {
    /// Validate every field and build the criteria.
    ///
    /// Counts must be positive integers, `contains_character` must be exactly
    /// one character and the length bounds must not be inverted.
    pub fn into_criteria(self) -> QueryResult<FilterCriteria> {
        let criteria = FilterCriteria {
            is_palindrome: self.is_palindrome,
            min_length: self.min_length.map(|v| positive("min_length", v)).transpose()?,
            max_length: self.max_length.map(|v| positive("max_length", v)).transpose()?,
            word_count: self.word_count.map(|v| positive("word_count", v)).transpose()?,
            contains_character: self
                .contains_character
                .as_deref()
                .map(single_character)
                .transpose()?,
        };
        criteria.check_consistency()?;
        Ok(criteria)
    }
}

fn positive(name: &'static str, value: i64) -> QueryResult<usize> {
    if value < 1 {
        return Err(QueryError::InvalidParameter {
            name,
            reason: format!("must be a positive integer, got {}", value),
        });
    }
    usize::try_from(value).map_err(|_| QueryError::InvalidParameter {
        name,
        reason: format!("{} is out of range", value),
    })
}

fn single_character(value: &str) -> QueryResult<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(QueryError::InvalidParameter {
            name: "contains_character",
            reason: format!("must be exactly one character, got {:?}", value),
        }),
    }
}
