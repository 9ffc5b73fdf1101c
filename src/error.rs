//! Unified error types for the extraction pipeline.
//!
//! Each stage has its own error enum; `ExtractError` rolls them up so
//! `extract_table` and the CLI can report one error per failed run.

use std::path::PathBuf;

/// Result type for whole-pipeline operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur loading extraction config or settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to parse settings file: {0}")]
    SettingsParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid override type '{tag}' for column '{column}'")]
    InvalidOverrideType { column: String, tag: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur reading column values from a source table.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column not found: {table}.{column}")]
    ColumnNotFound { table: String, column: String },
}

pub type ReaderResult<T> = Result<T, ReaderError>;

/// A column's values do not conform to its classified or forced type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Column '{column}' has no values parseable as {expected}")]
pub struct TypeInferenceError {
    pub column: String,
    pub expected: crate::model::SemanticType,
}

/// Errors that can occur assembling profiled columns into table metadata.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("Table '{0}' has no rows")]
    EmptyTable(String),

    #[error("Table '{0}' has no columns")]
    NoColumns(String),
}

/// Errors that can occur writing metadata out.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Top-level error for a full extraction run.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Reader error: {0}")]
    Reader(#[from] ReaderError),

    #[error("Type inference error: {0}")]
    TypeInference(#[from] TypeInferenceError),

    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}
