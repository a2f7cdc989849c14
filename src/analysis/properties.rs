//! Deterministic property computation for raw strings

use super::types::{FrequencyMap, StringProperties};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Compute every derived property of `input`.
///
/// Total and pure: the empty string is valid input and the same input always
/// yields the same result.
pub fn compute_properties(input: &str) -> StringProperties {
    StringProperties {
        length: input.chars().count(),
        is_palindrome: is_palindrome(input),
        unique_characters: input.chars().collect::<HashSet<_>>().len(),
        word_count: word_count(input),
        sha256_hash: identity_hash(input),
        character_frequency_map: character_frequencies(input),
    }
}

/// Lowercase hex SHA-256 of the raw UTF-8 bytes.
pub fn identity_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lower-case and keep only ASCII letters and digits.
pub fn normalize_for_palindrome(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A string is a palindrome when its normalized form is non-empty and equal
/// to its reversal.
pub fn is_palindrome(input: &str) -> bool {
    let normalized = normalize_for_palindrome(input);
    // Normalized text is ASCII, so byte reversal is character reversal.
    !normalized.is_empty() && normalized.bytes().eq(normalized.bytes().rev())
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

pub fn character_frequencies(input: &str) -> FrequencyMap {
    let mut counts = FrequencyMap::new();
    for c in input.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}
