//! Date profiler: range detection under an explicit or detected format.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::TypeInferenceError;
use crate::model::{DateStats, SemanticType};

/// Formats probed, in order, when no explicit format is configured.
pub const COMMON_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y%m%d",
    "%d-%b-%Y",
];

/// First common format under which every non-null value parses. `None` when
/// the column has no non-null values or no single format covers them all.
pub fn detect_format(values: &[Option<String>]) -> Option<&'static str> {
    let mut non_null = values.iter().flatten().peekable();
    non_null.peek()?;

    COMMON_DATE_FORMATS.iter().copied().find(|format| {
        values
            .iter()
            .flatten()
            .all(|v| NaiveDate::parse_from_str(v.trim(), format).is_ok())
    })
}

/// Profile a date column. Returns the stats plus how many non-null values
/// failed to parse under the chosen format.
///
/// With an explicit format that format is used as-is. Without one, the
/// common-format table is probed and the best-covering format wins, so a
/// forced override still profiles a column with a few stray values. Zero
/// parseable values is a fatal inference error naming the column.
pub fn profile_date(
    column_name: &str,
    values: &[Option<String>],
    explicit_format: Option<&str>,
) -> Result<(DateStats, u64), TypeInferenceError> {
    let format = match explicit_format {
        Some(format) => format.to_string(),
        None => best_covering_format(values).to_string(),
    };

    let mut parsed: Vec<NaiveDate> = Vec::new();
    let mut unparsable: u64 = 0;
    for value in values.iter().flatten() {
        match NaiveDate::parse_from_str(value.trim(), &format) {
            Ok(date) => parsed.push(date),
            Err(_) => {
                unparsable += 1;
                warn!(column = column_name, value = %value, format = %format, "value not parseable as date");
            }
        }
    }

    let (min_date, max_date) = match (parsed.iter().min(), parsed.iter().max()) {
        (Some(min), Some(max)) => (*min, *max),
        _ => {
            return Err(TypeInferenceError {
                column: column_name.to_string(),
                expected: SemanticType::Date,
            })
        }
    };

    Ok((
        DateStats {
            min_date,
            max_date,
            format,
        },
        unparsable,
    ))
}

/// The common format that parses the most values; ties go to probe order.
fn best_covering_format(values: &[Option<String>]) -> &'static str {
    let mut best = COMMON_DATE_FORMATS[0];
    let mut best_count = 0usize;
    for format in COMMON_DATE_FORMATS {
        let count = values
            .iter()
            .flatten()
            .filter(|v| NaiveDate::parse_from_str(v.trim(), format).is_ok())
            .count();
        if count > best_count {
            best = format;
            best_count = count;
        }
    }
    best
}
