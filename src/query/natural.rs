//! Natural-language query parsing
//!
//! Free text is lower-cased and trimmed, then run through a fixed, ordered
//! list of extraction rules. Each rule looks at the whole text and may set
//! fields on the criteria being built. When two rules set the same field the
//! later one wins; within the length rule the same holds per phrase, so
//! "at most N" replaces "shorter than N" and "between N and M" replaces both
//! bounds.

use super::criteria::FilterCriteria;
use super::types::{QueryError, QueryResult};
use once_cell::sync::Lazy;
use regex::Regex;

/// One extraction rule: inspects the normalized text and updates criteria.
type Rule = fn(&str, &mut FilterCriteria) -> QueryResult<()>;

/// Rules in evaluation order.
const RULES: [(&str, Rule); 4] = [
    ("palindrome", palindrome_rule),
    ("word_count", word_count_rule),
    ("length", length_rule),
    ("character", character_rule),
];

const PALINDROME_KEYWORDS: [&str; 4] = [
    "palindrome",
    "palindromic",
    "reads the same",
    "same forwards and backwards",
];

const VOWELS: [(&str, char); 5] = [
    ("first vowel", 'a'),
    ("second vowel", 'e'),
    ("third vowel", 'i'),
    ("fourth vowel", 'o'),
    ("fifth vowel", 'u'),
];

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("natural-language rule pattern must compile")
}

static SINGLE_WORD: Lazy<Regex> = Lazy::new(|| pattern(r"\b(?:single|one|1)[\s-]+word"));
static TWO_WORD: Lazy<Regex> = Lazy::new(|| pattern(r"\b(?:two|2)[\s-]+word"));
static THREE_WORD: Lazy<Regex> = Lazy::new(|| pattern(r"\b(?:three|3)[\s-]+word"));
static N_WORDS: Lazy<Regex> = Lazy::new(|| pattern(r"\b(\d+)\s+words?\b"));

static LONGER_THAN: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?:longer than|more than|at least)\s+(\d+)"));
static SHORTER_THAN: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?:shorter than|less than|fewer than)\s+(\d+)"));
static AT_MOST: Lazy<Regex> = Lazy::new(|| pattern(r"at most\s+(\d+)"));
static BETWEEN: Lazy<Regex> = Lazy::new(|| pattern(r"between\s+(\d+)\s+and\s+(\d+)"));

static LETTER: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?:contains|containing|contain|with|has|having)\s+(?:the\s+)?(?:letter|character)\s+([a-z])")
});
static CONTAINING: Lazy<Regex> = Lazy::new(|| pattern(r"containing\s+([a-z])(?:\s|$)"));

/// Parse free text into filter criteria.
///
/// Fails with [`QueryError::Unparseable`] when no rule recognizes anything and
/// with [`QueryError::ConflictingFilters`] when the resulting length bounds
/// contradict each other. Any other failure raised by a rule is reported as
/// `Unparseable`.
pub fn parse_natural_language(text: &str) -> QueryResult<FilterCriteria> {
    let normalized = text.trim().to_lowercase();
    let mut criteria = FilterCriteria::new();

    for (name, rule) in RULES {
        if let Err(err) = rule(&normalized, &mut criteria) {
            tracing::debug!(rule = name, error = %err, "natural-language rule failed");
            return Err(match err {
                QueryError::ConflictingFilters(_) => err,
                _ => QueryError::Unparseable,
            });
        }
    }

    if criteria.is_empty() {
        return Err(QueryError::Unparseable);
    }
    criteria.check_consistency()?;

    Ok(criteria)
}

fn palindrome_rule(text: &str, criteria: &mut FilterCriteria) -> QueryResult<()> {
    if PALINDROME_KEYWORDS.iter().any(|k| text.contains(k)) {
        criteria.is_palindrome = Some(true);
    }
    Ok(())
}

fn word_count_rule(text: &str, criteria: &mut FilterCriteria) -> QueryResult<()> {
    let count = if SINGLE_WORD.is_match(text) {
        Some(1)
    } else if TWO_WORD.is_match(text) {
        Some(2)
    } else if THREE_WORD.is_match(text) {
        Some(3)
    } else {
        capture_number(&N_WORDS, text, 1)?
    };

    if count.is_some() {
        criteria.word_count = count;
    }
    Ok(())
}

fn length_rule(text: &str, criteria: &mut FilterCriteria) -> QueryResult<()> {
    if let Some(n) = capture_number(&LONGER_THAN, text, 1)? {
        criteria.min_length = Some(n.checked_add(1).ok_or(QueryError::Unparseable)?);
    }

    // "shorter than 0" admits no string, unless a later phrase replaces it.
    let mut impossible = false;
    if let Some(n) = capture_number(&SHORTER_THAN, text, 1)? {
        match n.checked_sub(1) {
            Some(max) => criteria.max_length = Some(max),
            None => impossible = true,
        }
    }

    if let Some(n) = capture_number(&AT_MOST, text, 1)? {
        criteria.max_length = Some(n);
        impossible = false;
    }

    if let Some(caps) = BETWEEN.captures(text) {
        criteria.min_length = Some(parse_number(&caps[1])?);
        criteria.max_length = Some(parse_number(&caps[2])?);
        impossible = false;
    }

    if impossible {
        return Err(QueryError::ConflictingFilters(
            "no string is shorter than 0 characters".into(),
        ));
    }
    Ok(())
}

fn character_rule(text: &str, criteria: &mut FilterCriteria) -> QueryResult<()> {
    let found = capture_letter(&LETTER, text)
        .or_else(|| {
            VOWELS
                .iter()
                .find(|(phrase, _)| text.contains(phrase))
                .map(|(_, vowel)| *vowel)
        })
        .or_else(|| capture_letter(&CONTAINING, text));

    if found.is_some() {
        criteria.contains_character = found;
    }
    Ok(())
}

fn capture_number(re: &Regex, text: &str, group: usize) -> QueryResult<Option<usize>> {
    match re.captures(text).and_then(|caps| caps.get(group)) {
        Some(m) => parse_number(m.as_str()).map(Some),
        None => Ok(None),
    }
}

fn capture_letter(re: &Regex, text: &str) -> Option<char> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
}

fn parse_number(digits: &str) -> QueryResult<usize> {
    digits.parse().map_err(|_| QueryError::Unparseable)
}
