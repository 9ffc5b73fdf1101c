//! Numeric profiler: summary statistics over parseable values.

use tracing::warn;

use crate::error::TypeInferenceError;
use crate::model::{NumericStats, Quartiles, SemanticType};

/// Parse one source value as a number. Tolerates surrounding whitespace.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Profile a numeric column. Returns the stats plus how many non-null
/// values failed to parse (each one is logged as a data-quality event).
///
/// A column with non-null values where nothing parses cannot be numeric;
/// that is a fatal inference error naming the column. An all-null column
/// profiles to all-`None` stats.
pub fn profile_numeric(
    column_name: &str,
    values: &[Option<String>],
) -> Result<(NumericStats, u64), TypeInferenceError> {
    let mut parsed: Vec<f64> = Vec::new();
    let mut unparsable: u64 = 0;
    let mut non_null: u64 = 0;

    for value in values.iter().flatten() {
        non_null += 1;
        match parse_numeric(value) {
            Some(n) => parsed.push(n),
            None => {
                unparsable += 1;
                warn!(column = column_name, value = %value, "value not parseable as numeric");
            }
        }
    }

    if parsed.is_empty() {
        if non_null > 0 {
            return Err(TypeInferenceError {
                column: column_name.to_string(),
                expected: SemanticType::Numeric,
            });
        }
        return Ok((
            NumericStats {
                min: None,
                max: None,
                mean: None,
                stddev: None,
                quartiles: None,
            },
            0,
        ));
    }

    parsed.sort_by(|a, b| a.total_cmp(b));
    let n = parsed.len() as f64;
    let mean = parsed.iter().sum::<f64>() / n;
    let variance = parsed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let stats = NumericStats {
        min: Some(parsed[0]),
        max: Some(parsed[parsed.len() - 1]),
        mean: Some(mean),
        stddev: Some(variance.sqrt()),
        quartiles: Some(Quartiles {
            q1: percentile(&parsed, 0.25),
            median: percentile(&parsed, 0.5),
            q3: percentile(&parsed, 0.75),
        }),
    };
    Ok((stats, unparsable))
}

/// Linear-interpolation percentile over a sorted sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = pos - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
