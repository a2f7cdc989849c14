//! String analysis
//!
//! Turns a raw string into the set of properties that identify and describe
//! it. Nothing here touches storage.

mod properties;
mod types;

pub use properties::{
    character_frequencies, compute_properties, identity_hash, is_palindrome,
    normalize_for_palindrome, word_count,
};
pub use types::{AnalyzedString, FrequencyMap, RecordView, StringProperties};
