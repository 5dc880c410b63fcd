use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A value that occurs more than once, with its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCount {
    pub value: String,
    pub occurrences: usize,
}

/// Returns true if any value appears more than once. Comparison is exact.
pub fn has_duplicate<S: AsRef<str>>(values: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(values.len());
    values.iter().any(|value| !seen.insert(value.as_ref()))
}

/// Returns each repeated value once, ordered by its first occurrence.
pub fn find_duplicates<S: AsRef<str>>(values: &[S]) -> Vec<&str> {
    let counts = occurrence_counts(values);
    let mut emitted = HashSet::new();
    values
        .iter()
        .map(|value| value.as_ref())
        .filter(|value| counts.get(value).copied().unwrap_or(0) > 1)
        .filter(|value| emitted.insert(*value))
        .collect()
}

/// Like [`find_duplicates`], but also reports how often each value occurs.
pub fn count_duplicates<S: AsRef<str>>(values: &[S]) -> Vec<DuplicateCount> {
    let counts = occurrence_counts(values);
    find_duplicates(values)
        .into_iter()
        .map(|value| DuplicateCount {
            value: value.to_string(),
            occurrences: counts.get(value).copied().unwrap_or(0),
        })
        .collect()
}

fn occurrence_counts<S: AsRef<str>>(values: &[S]) -> HashMap<&str, usize> {
    let mut counts = HashMap::with_capacity(values.len());
    for value in values {
        *counts.entry(value.as_ref()).or_insert(0) += 1;
    }
    counts
}
