//! Gmeta JSON document writer.
//!
//! The document is a table-level block plus the column array in physical
//! order. The file write is atomic (temp file + rename), so a failed run
//! never leaves a partial document behind.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::model::{ColumnStats, SemanticType, TableMetadata};

/// Top-level Gmeta document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmetaDocument {
    pub table: GmetaTable,
    pub columns: Vec<GmetaColumn>,
}

/// Table-level block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmetaTable {
    pub schema_name: String,
    pub table_name: String,
    pub row_count: u64,
    pub column_count: u64,
    pub table_size_bytes: Option<u64>,
    pub extracted_at: DateTime<Utc>,
}

/// One column entry: identity, inferred type, and the type-tagged stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmetaColumn {
    pub name: String,
    pub declared_type: Option<String>,
    pub semantic_type: SemanticType,
    pub override_applied: bool,
    pub null_count: u64,
    pub distinct_count: u64,
    pub stats: ColumnStats,
}

impl GmetaDocument {
    pub fn from_metadata(metadata: &TableMetadata) -> Self {
        Self {
            table: GmetaTable {
                schema_name: metadata.schema_name.clone(),
                table_name: metadata.table_name.clone(),
                row_count: metadata.row_count,
                column_count: metadata.column_count,
                table_size_bytes: metadata.table_size_bytes,
                extracted_at: metadata.extracted_at,
            },
            columns: metadata
                .columns
                .iter()
                .map(|column| GmetaColumn {
                    name: column.name.clone(),
                    declared_type: column.declared_type.clone(),
                    semantic_type: column.semantic_type(),
                    override_applied: column.override_applied,
                    null_count: column.null_count,
                    distinct_count: column.distinct_count,
                    stats: column.stats.clone(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Serialize `metadata` and write it to `path` atomically.
pub fn write_gmeta(metadata: &TableMetadata, path: &Path) -> ExportResult<()> {
    let document = GmetaDocument::from_metadata(metadata);
    let json = document.to_json_pretty()?;

    let file_name = path
        .file_name()
        .ok_or_else(|| {
            ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a file path: {}", path.display()),
            ))
        })?
        .to_os_string();

    let mut tmp_name = file_name;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
