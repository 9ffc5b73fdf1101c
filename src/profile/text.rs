//! Free-text profiler: byte-length distribution of non-null values.

use crate::model::TextStats;

/// Length statistics over non-null values. All-null columns get all-`None`
/// stats.
pub fn profile_text(values: &[Option<String>]) -> TextStats {
    let mut lengths: Vec<u64> = values
        .iter()
        .flatten()
        .map(|v| v.len() as u64)
        .collect();

    if lengths.is_empty() {
        return TextStats {
            min_length: None,
            max_length: None,
            median_length: None,
        };
    }

    lengths.sort_unstable();
    let n = lengths.len();
    let median = if n % 2 == 1 {
        lengths[n / 2] as f64
    } else {
        (lengths[n / 2 - 1] + lengths[n / 2]) as f64 / 2.0
    };

    TextStats {
        min_length: Some(lengths[0]),
        max_length: Some(lengths[n - 1]),
        median_length: Some(median),
    }
}
