//! Semantic type classifier.
//!
//! Decision order: configured override, then the categorical check, then
//! date, then numeric, then text as the fallback. The categorical check is
//! authoritative: a low-cardinality column of numbers is a code column.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ExtractionConfig;
use crate::model::SemanticType;
use crate::profile::{detect_format, parse_numeric};

/// The classifier's verdict for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub semantic_type: SemanticType,
    /// True when the type came from config rather than inference.
    pub override_applied: bool,
}

/// Incremental distinct counter that stops accumulating once the running
/// count exceeds its threshold, so high-cardinality columns never
/// materialize their full distinct set here.
#[derive(Debug)]
pub struct DistinctCounter {
    threshold: i64,
    seen: HashSet<String>,
    exceeded: bool,
}

impl DistinctCounter {
    /// A zero or negative threshold means no column is ever categorical;
    /// the counter starts out exceeded.
    pub fn new(threshold: i64) -> Self {
        Self {
            threshold,
            seen: HashSet::new(),
            exceeded: threshold <= 0,
        }
    }

    /// Observe one non-null value. Returns false once the threshold has
    /// been exceeded; further observations are no-ops.
    pub fn observe(&mut self, value: &str) -> bool {
        if self.exceeded {
            return false;
        }
        if !self.seen.contains(value) {
            self.seen.insert(value.to_string());
            if self.seen.len() as i64 > self.threshold {
                self.seen.clear();
                self.exceeded = true;
            }
        }
        !self.exceeded
    }

    pub fn exceeded(&self) -> bool {
        self.exceeded
    }

    /// Distinct count seen so far. Only meaningful while within threshold.
    pub fn count(&self) -> u64 {
        self.seen.len() as u64
    }
}

/// Infer the semantic type of one column.
pub fn classify(
    column_name: &str,
    values: &[Option<String>],
    config: &ExtractionConfig,
) -> Classification {
    if let Some(ty) = config.override_for(column_name) {
        debug!(column = column_name, semantic_type = %ty, "type override applied");
        return Classification {
            semantic_type: ty,
            override_applied: true,
        };
    }

    let semantic_type = infer(values, config);
    debug!(column = column_name, semantic_type = %semantic_type, "type inferred");
    Classification {
        semantic_type,
        override_applied: false,
    }
}

fn infer(values: &[Option<String>], config: &ExtractionConfig) -> SemanticType {
    let mut counter = DistinctCounter::new(config.categorical_threshold);
    for value in values.iter().flatten() {
        if !counter.observe(value) {
            break;
        }
    }
    if !counter.exceeded() {
        return SemanticType::Code;
    }

    let non_null: Vec<&String> = values.iter().flatten().collect();

    let date_matches = match &config.date_format {
        Some(format) => {
            !non_null.is_empty()
                && non_null
                    .iter()
                    .all(|v| chrono::NaiveDate::parse_from_str(v.trim(), format).is_ok())
        }
        None => detect_format(values).is_some(),
    };
    if date_matches {
        return SemanticType::Date;
    }

    if !non_null.is_empty() && non_null.iter().all(|v| parse_numeric(v).is_some()) {
        return SemanticType::Numeric;
    }

    SemanticType::Text
}
