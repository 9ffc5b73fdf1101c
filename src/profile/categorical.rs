//! Categorical profiler: frequency table over distinct values.

use std::collections::BTreeMap;

use crate::model::{CategoricalStats, CodeFrequency};

/// Frequency per distinct non-null value, sorted ascending by value so the
/// same snapshot always profiles to the same output. Nulls are tracked by
/// the dispatcher, never as a code.
pub fn profile_categorical(values: &[Option<String>]) -> CategoricalStats {
    let mut frequencies: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values.iter().flatten() {
        *frequencies.entry(value.as_str()).or_insert(0) += 1;
    }

    let values: Vec<CodeFrequency> = frequencies
        .into_iter()
        .map(|(value, frequency)| CodeFrequency {
            value: value.to_string(),
            frequency,
        })
        .collect();
    let value_count = values.len() as u64;

    CategoricalStats {
        values,
        value_count,
    }
}
