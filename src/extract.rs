//! End-to-end extraction from a source table to exported metadata.
//!
//! This module provides the high-level API for one extraction run:
//!
//! ```text
//! Reader → Classify → Profile (per column) → Assemble → Export
//! ```
//!
//! # Example
//!
//! ```ignore
//! use metaprofile::config::ExtractionConfig;
//! use metaprofile::extract::extract_table;
//! use metaprofile::reader::MemoryReader;
//!
//! let reader = MemoryReader::new("orders")
//!     .with_str_column("status", vec![Some("open"), Some("closed"), Some("open")]);
//! let config = ExtractionConfig::new("public", "orders");
//!
//! let metadata = extract_table(&reader, &config)?;
//! println!("{} columns", metadata.column_count);
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::assemble::assemble;
use crate::classify::classify;
use crate::config::ExtractionConfig;
use crate::error::ExtractResult;
use crate::export::gmeta::write_gmeta;
use crate::export::store::MetadataStore;
use crate::model::{ColumnMetadata, TableMetadata};
use crate::profile::profile;
use crate::reader::ColumnReader;

/// What a full `run` produced.
#[derive(Debug)]
pub struct RunOutput {
    pub metadata: TableMetadata,
    /// Where the Gmeta document was written, when configured.
    pub gmeta_path: Option<PathBuf>,
    /// The snapshot's `data_table` id, when a store was given.
    pub data_table_id: Option<i64>,
}

/// Extract metadata for one table: classify and profile every column, then
/// assemble the canonical model. All-or-nothing: any column failure aborts
/// the whole table.
pub fn extract_table(
    reader: &dyn ColumnReader,
    config: &ExtractionConfig,
) -> ExtractResult<TableMetadata> {
    let row_count = reader.row_count()?;
    let column_infos = reader.columns()?;
    info!(
        table = %format!("{}.{}", config.schema, config.table),
        rows = row_count,
        columns = column_infos.len(),
        "extraction started"
    );

    let mut columns: Vec<ColumnMetadata> = Vec::with_capacity(column_infos.len());
    for info in &column_infos {
        let values = reader.read_column(&info.name)?;
        let classification = classify(&info.name, &values, config);
        let profiled = profile(&info.name, classification.semantic_type, &values, config)?;

        columns.push(ColumnMetadata {
            name: info.name.clone(),
            declared_type: info.declared_type.clone(),
            override_applied: classification.override_applied,
            null_count: profiled.null_count,
            distinct_count: profiled.distinct_count,
            stats: profiled.stats,
        });
    }

    let table_size = reader.table_size_bytes()?;
    let metadata = assemble(
        config.schema.clone(),
        config.table.clone(),
        row_count,
        table_size,
        columns,
    )?;
    info!(table = %metadata.qualified_name(), "extraction finished");
    Ok(metadata)
}

/// Extract one table and export the result: a store snapshot when a store
/// is given, and the Gmeta document when `config.gmeta_output` is set.
pub fn run(
    reader: &dyn ColumnReader,
    config: &ExtractionConfig,
    store: Option<&mut MetadataStore>,
) -> ExtractResult<RunOutput> {
    let metadata = extract_table(reader, config)?;

    let data_table_id = match store {
        Some(store) => {
            let id = store.record_snapshot(&metadata)?;
            info!(table = %metadata.qualified_name(), data_table_id = id, "snapshot recorded");
            Some(id)
        }
        None => None,
    };

    let gmeta_path = match &config.gmeta_output {
        Some(path) => {
            write_gmeta(&metadata, path)?;
            info!(path = %path.display(), "gmeta document written");
            Some(path.clone())
        }
        None => None,
    };

    Ok(RunOutput {
        metadata,
        gmeta_path,
        data_table_id,
    })
}
