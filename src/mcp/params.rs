//! MCP tool parameter structs with schemars-derived JSON schemas.
//!
//! Each struct validates itself before anything reaches the service.

use crate::api::{AnalysisError, AnalysisResult};
use crate::query::{FilterCriteria, FilterParams};
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateStringParams {
    #[schemars(description = "The string to analyze and store")]
    pub value: Option<String>,
}

impl CreateStringParams {
    pub fn validate(&self) -> AnalysisResult<&str> {
        match self.value.as_deref() {
            None => Err(AnalysisError::Validation("missing 'value' field".into())),
            Some("") => Err(AnalysisError::Validation("'value' must not be empty".into())),
            Some(value) => Ok(value),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct StringValueParams {
    #[schemars(description = "Exact string value, case and whitespace significant")]
    pub value: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListStringsParams {
    #[schemars(description = "Only palindromes (true) or only non-palindromes (false)")]
    pub is_palindrome: Option<bool>,
    #[schemars(description = "Minimum length, inclusive (positive integer)")]
    pub min_length: Option<i64>,
    #[schemars(description = "Maximum length, inclusive (positive integer)")]
    pub max_length: Option<i64>,
    #[schemars(description = "Exact number of words (positive integer)")]
    pub word_count: Option<i64>,
    #[schemars(description = "A single character the string must contain, case-insensitive")]
    pub contains_character: Option<String>,
}

impl ListStringsParams {
    pub fn into_criteria(self) -> AnalysisResult<FilterCriteria> {
        let params = FilterParams {
            is_palindrome: self.is_palindrome,
            min_length: self.min_length,
            max_length: self.max_length,
            word_count: self.word_count,
            contains_character: self.contains_character,
        };
        Ok(params.into_criteria()?)
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NaturalLanguageParams {
    #[schemars(description = "Free-text query, e.g. 'single word palindromic strings'")]
    pub query: Option<String>,
}

impl NaturalLanguageParams {
    pub fn validate(&self) -> AnalysisResult<&str> {
        match self.query.as_deref() {
            Some(q) if !q.trim().is_empty() => Ok(q),
            _ => Err(AnalysisError::Validation("no query parameter".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_non_empty_value() {
        assert!(CreateStringParams { value: None }.validate().is_err());
        assert!(CreateStringParams { value: Some(String::new()) }.validate().is_err());
        // Whitespace is a legitimate value
        assert_eq!(
            CreateStringParams { value: Some(" ".into()) }.validate().unwrap(),
            " "
        );
    }

    #[test]
    fn test_list_params_are_validated() {
        let params: ListStringsParams =
            serde_json::from_str(r#"{"min_length": 0}"#).unwrap();
        let err = params.into_criteria().unwrap_err();
        assert_eq!(err.status_code(), 400);

        let params: ListStringsParams =
            serde_json::from_str(r#"{"is_palindrome": true, "contains_character": "a"}"#).unwrap();
        assert_eq!(
            params.into_criteria().unwrap(),
            FilterCriteria::new().with_palindrome(true).with_character('a')
        );
    }

    #[test]
    fn test_natural_language_requires_query() {
        assert!(NaturalLanguageParams { query: None }.validate().is_err());
        assert!(NaturalLanguageParams { query: Some("  ".into()) }.validate().is_err());
        assert_eq!(
            NaturalLanguageParams { query: Some("palindromes".into()) }.validate().unwrap(),
            "palindromes"
        );
    }
}
