//! Shared helpers for strand integration tests

#![allow(dead_code)]

use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;
use strand::{AnalysisService, MemoryStore, OpenStore, RecordView, SqliteStore};
use tempfile::TempDir;

/// Strings used to seed stores: palindromes, multi-word text, mixed case,
/// punctuation and the empty-ish cases.
pub const CORPUS: &[&str] = &[
    "racecar",
    "noon",
    "level",
    "A man a plan a canal Panama",
    "Was it a car or a cat I saw",
    "hello world",
    "the quick brown fox",
    "Rust",
    "zebra",
    "!!!",
    " ",
    "abc def ghi",
];

/// Service over a fresh in-memory store
pub fn memory_service() -> AnalysisService {
    AnalysisService::new(Arc::new(MemoryStore::new()))
}

/// Service over a fresh SQLite file. Keep the `TempDir` alive for the test.
pub fn sqlite_service() -> (AnalysisService, TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("strand.db");
    let store = SqliteStore::open(&path).expect("open sqlite store");
    (AnalysisService::new(Arc::new(store)), dir, path)
}

pub fn seed(service: &AnalysisService) {
    for value in CORPUS {
        service.create(value).expect("seed value");
    }
}

/// Values of the records, sorted for order-independent comparison
pub fn sorted_values(data: &[RecordView]) -> Vec<String> {
    let mut values: Vec<String> = data.iter().map(|r| r.value.clone()).collect();
    values.sort();
    values
}

/// Deterministic pseudo-random strings drawn from a small alphabet so that
/// palindromes, repeated words and case variants actually occur.
pub fn random_strings(seed: u64, count: usize) -> Vec<String> {
    const ALPHABET: &[char] = &['a', 'b', 'A', 'B', 'x', ' ', '.', '1'];
    let mut rng = StdRng::seed_from_u64(seed);
    let pick = Uniform::from(0..ALPHABET.len());

    (0..count)
        .map(|_| {
            let len = rng.gen_range(0..9);
            (0..len).map(|_| ALPHABET[pick.sample(&mut rng)]).collect()
        })
        .collect()
}
