//! Per-run extraction configuration.
//!
//! Loadable from a JSON config file:
//! ```json
//! {
//!   "schema": "public",
//!   "table": "orders",
//!   "categorical_threshold": 10,
//!   "date_format": "%Y-%m-%d",
//!   "type_overrides": { "status": "code" },
//!   "gmeta_output": "orders.gmeta.json"
//! }
//! ```
//!
//! Override tags are validated here, at load time, so an unrecognized tag
//! never reaches the classifier.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::model::SemanticType;

pub const DEFAULT_CATEGORICAL_THRESHOLD: i64 = 10;

/// Configuration for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Schema of the source table.
    pub schema: String,

    /// Name of the source table.
    pub table: String,

    /// Columns with at most this many distinct non-null values are
    /// categorical. Zero or negative means no column is ever categorical.
    pub categorical_threshold: i64,

    /// Explicit strftime date format. When unset, a table of common formats
    /// is probed instead.
    pub date_format: Option<String>,

    /// Per-column semantic type overrides, skipping inference entirely.
    pub type_overrides: BTreeMap<String, SemanticType>,

    /// Where to write the Gmeta JSON document. `None` skips the file export.
    pub gmeta_output: Option<PathBuf>,
}

/// Raw config-file shape. Override tags stay strings here so a bad tag can
/// be reported with its column name instead of as a bare serde error.
#[derive(Debug, Deserialize)]
struct RawExtractionConfig {
    schema: String,
    table: String,
    categorical_threshold: Option<i64>,
    date_format: Option<String>,
    #[serde(default)]
    type_overrides: BTreeMap<String, String>,
    gmeta_output: Option<PathBuf>,
}

impl ExtractionConfig {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            date_format: None,
            type_overrides: BTreeMap::new(),
            gmeta_output: None,
        }
    }

    pub fn with_categorical_threshold(mut self, threshold: i64) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn with_override(mut self, column: impl Into<String>, ty: SemanticType) -> Self {
        self.type_overrides.insert(column.into(), ty);
        self
    }

    pub fn with_gmeta_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.gmeta_output = Some(path.into());
        self
    }

    /// Load a run configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let raw: RawExtractionConfig = serde_json::from_str(&content)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawExtractionConfig) -> ConfigResult<Self> {
        let mut type_overrides = BTreeMap::new();
        for (column, tag) in raw.type_overrides {
            let ty = SemanticType::from_tag(&tag).ok_or_else(|| {
                ConfigError::InvalidOverrideType {
                    column: column.clone(),
                    tag: tag.clone(),
                }
            })?;
            type_overrides.insert(column, ty);
        }

        Ok(Self {
            schema: raw.schema,
            table: raw.table,
            categorical_threshold: raw
                .categorical_threshold
                .unwrap_or(DEFAULT_CATEGORICAL_THRESHOLD),
            date_format: raw.date_format,
            type_overrides,
            gmeta_output: raw.gmeta_output,
        })
    }

    /// The override for `column`, if one is configured.
    pub fn override_for(&self, column: &str) -> Option<SemanticType> {
        self.type_overrides.get(column).copied()
    }
}
