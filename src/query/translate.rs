//! Translation of filter criteria into record predicates
//!
//! Both query paths (structured parameters and parsed natural language) end
//! up here. Stores execute the resulting predicate; none of them reads
//! `FilterCriteria` directly.

use super::criteria::FilterCriteria;
use crate::analysis::AnalyzedString;

/// A single constraint on a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Palindrome flag equals the value
    IsPalindrome(bool),
    /// Length within inclusive bounds; a missing bound is open
    LengthRange {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Word count equals the value
    WordCount(usize),
    /// Original string contains the character, ignoring case
    ContainsCharacter(char),
}

impl Condition {
    /// Evaluate this condition against a record
    pub fn matches(&self, record: &AnalyzedString) -> bool {
        match *self {
            Condition::IsPalindrome(expected) => record.is_palindrome() == expected,
            Condition::LengthRange { min, max } => {
                let length = record.length();
                min.map_or(true, |m| length >= m) && max.map_or(true, |m| length <= m)
            }
            Condition::WordCount(expected) => record.word_count() == expected,
            Condition::ContainsCharacter(c) => {
                let (lower, upper) = case_variants(c);
                record
                    .original_string
                    .chars()
                    .any(|ch| ch == lower || ch == upper)
            }
        }
    }
}

/// Conjunction of conditions. An empty predicate matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPredicate {
    conditions: Vec<Condition>,
}

impl RecordPredicate {
    /// Predicate without constraints
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_unconstrained(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &AnalyzedString) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

/// Build the predicate for `criteria`.
///
/// Conditions are emitted in field order: palindrome, length, word count,
/// character.
pub fn translate(criteria: &FilterCriteria) -> RecordPredicate {
    let mut predicate = RecordPredicate::all();

    if let Some(is_palindrome) = criteria.is_palindrome {
        predicate = predicate.and(Condition::IsPalindrome(is_palindrome));
    }

    if criteria.min_length.is_some() || criteria.max_length.is_some() {
        predicate = predicate.and(Condition::LengthRange {
            min: criteria.min_length,
            max: criteria.max_length,
        });
    }

    if let Some(word_count) = criteria.word_count {
        predicate = predicate.and(Condition::WordCount(word_count));
    }

    if let Some(c) = criteria.contains_character {
        predicate = predicate.and(Condition::ContainsCharacter(c));
    }

    predicate
}

/// Lower- and upper-case forms of `c`.
///
/// Characters whose case mapping expands to several characters (e.g. 'ß')
/// keep their own form on that side.
pub fn case_variants(c: char) -> (char, char) {
    fn single(mut mapped: impl Iterator<Item = char>, fallback: char) -> char {
        match (mapped.next(), mapped.next()) {
            (Some(only), None) => only,
            _ => fallback,
        }
    }
    (single(c.to_lowercase(), c), single(c.to_uppercase(), c))
}
