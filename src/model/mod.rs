//! Canonical metadata model.
//!
//! Everything downstream of profiling works against these types: the Gmeta
//! exporter serializes them, the metadata store normalizes them into rows,
//! and embedders receive them from [`crate::extract::extract_table`].
//!
//! `ColumnStats` is a closed tagged enum with one variant per semantic type,
//! so a column can never carry statistics of the wrong shape.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ===== Semantic types =====

/// The four semantic types a column can be inferred as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Free-form strings with no further structure.
    Text,
    /// Low-cardinality categorical values.
    Code,
    /// Values that parse as floating-point numbers.
    Numeric,
    /// Values that parse as calendar dates under a single format.
    Date,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Text => "text",
            SemanticType::Code => "code",
            SemanticType::Numeric => "numeric",
            SemanticType::Date => "date",
        }
    }

    /// Parse a lowercase tag as written in override config files.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(SemanticType::Text),
            "code" => Some(SemanticType::Code),
            "numeric" => Some(SemanticType::Numeric),
            "date" => Some(SemanticType::Date),
            _ => None,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Per-type statistics =====

/// Length statistics for a free-text column.
///
/// All fields are `None` when every value in the column is null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStats {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub median_length: Option<f64>,
}

/// One distinct value and how many times it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFrequency {
    pub value: String,
    pub frequency: u64,
}

/// Frequency table for a categorical column.
///
/// `values` is sorted ascending by value so output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalStats {
    pub values: Vec<CodeFrequency>,
    /// Number of distinct non-null values, always `values.len()`.
    pub value_count: u64,
}

/// Quartile boundaries computed by linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// Summary statistics for a numeric column.
///
/// Fields are `None` when the column has no parseable non-null values
/// after overrides (the profiler rejects that case for inferred columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Population standard deviation.
    pub stddev: Option<f64>,
    pub quartiles: Option<Quartiles>,
}

/// Date range for a date column, plus the format every value parsed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStats {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// strftime-style format string, e.g. `%Y-%m-%d`.
    pub format: String,
}

/// Statistics for one column, tagged by semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnStats {
    Text(TextStats),
    Code(CategoricalStats),
    Numeric(NumericStats),
    Date(DateStats),
}

impl ColumnStats {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            ColumnStats::Text(_) => SemanticType::Text,
            ColumnStats::Code(_) => SemanticType::Code,
            ColumnStats::Numeric(_) => SemanticType::Numeric,
            ColumnStats::Date(_) => SemanticType::Date,
        }
    }
}

// ===== Column and table metadata =====

/// Fully profiled metadata for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    /// Declared storage type from the source schema, if the reader knows it.
    pub declared_type: Option<String>,
    /// True when the semantic type came from an override rather than inference.
    pub override_applied: bool,
    pub null_count: u64,
    pub distinct_count: u64,
    pub stats: ColumnStats,
}

impl ColumnMetadata {
    pub fn semantic_type(&self) -> SemanticType {
        self.stats.semantic_type()
    }
}

/// Fully profiled metadata for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub schema_name: String,
    pub table_name: String,
    pub row_count: u64,
    pub column_count: u64,
    /// On-disk size in bytes, when the reader can determine it.
    pub table_size_bytes: Option<u64>,
    pub extracted_at: DateTime<Utc>,
    pub columns: Vec<ColumnMetadata>,
}

impl TableMetadata {
    /// `schema.table`, as used in log lines and store lookups.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}
