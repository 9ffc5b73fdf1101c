//! Per-type statistics profilers.
//!
//! Each profiler is a pure function over an immutable value snapshot; the
//! dispatcher adds the null and distinct bookkeeping every column gets
//! regardless of type. Unparsable values in numeric and date columns are
//! data-quality events: counted as nulls and logged, never silently dropped.

mod categorical;
mod date;
mod numeric;
mod text;

pub use categorical::profile_categorical;
pub use date::{detect_format, profile_date, COMMON_DATE_FORMATS};
pub use numeric::{parse_numeric, profile_numeric};
pub use text::profile_text;

use std::collections::HashSet;

use crate::config::ExtractionConfig;
use crate::error::TypeInferenceError;
use crate::model::{ColumnStats, SemanticType};

/// One column's stats plus the bookkeeping shared by all types.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfiledColumn {
    pub stats: ColumnStats,
    /// Source nulls plus values unparsable under the column's type.
    pub null_count: u64,
    /// Distinct non-null source values.
    pub distinct_count: u64,
}

/// Profile one column under its (classified or overridden) semantic type.
pub fn profile(
    column_name: &str,
    semantic_type: SemanticType,
    values: &[Option<String>],
    config: &ExtractionConfig,
) -> Result<ProfiledColumn, TypeInferenceError> {
    let base_nulls = values.iter().filter(|v| v.is_none()).count() as u64;
    let distinct_count = distinct_non_null(values);

    let (stats, unparsable) = match semantic_type {
        SemanticType::Text => (ColumnStats::Text(profile_text(values)), 0),
        SemanticType::Code => (ColumnStats::Code(profile_categorical(values)), 0),
        SemanticType::Numeric => {
            let (stats, unparsable) = profile_numeric(column_name, values)?;
            (ColumnStats::Numeric(stats), unparsable)
        }
        SemanticType::Date => {
            let (stats, unparsable) =
                profile_date(column_name, values, config.date_format.as_deref())?;
            (ColumnStats::Date(stats), unparsable)
        }
    };

    Ok(ProfiledColumn {
        stats,
        null_count: base_nulls + unparsable,
        distinct_count,
    })
}

fn distinct_non_null(values: &[Option<String>]) -> u64 {
    let mut seen: HashSet<&str> = HashSet::new();
    for value in values.iter().flatten() {
        seen.insert(value.as_str());
    }
    seen.len() as u64
}
