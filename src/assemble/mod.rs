//! Metadata assembler: profiled columns into one `TableMetadata`.
//!
//! Pure and infallible except for structural emptiness. Any upstream
//! classification or profiling failure aborts the run before this point,
//! so a `TableMetadata` is always complete; partial tables do not exist.

use chrono::Utc;

use crate::error::AssemblyError;
use crate::model::{ColumnMetadata, TableMetadata};

/// Assemble table metadata from fully profiled columns.
///
/// Column order is the reader's physical order and is preserved as given.
/// The extraction timestamp is stamped here, once per table.
pub fn assemble(
    schema_name: impl Into<String>,
    table_name: impl Into<String>,
    row_count: u64,
    table_size_bytes: Option<u64>,
    columns: Vec<ColumnMetadata>,
) -> Result<TableMetadata, AssemblyError> {
    let schema_name = schema_name.into();
    let table_name = table_name.into();
    let qualified = format!("{}.{}", schema_name, table_name);

    if row_count == 0 {
        return Err(AssemblyError::EmptyTable(qualified));
    }
    if columns.is_empty() {
        return Err(AssemblyError::NoColumns(qualified));
    }

    let column_count = columns.len() as u64;
    Ok(TableMetadata {
        schema_name,
        table_name,
        row_count,
        column_count,
        table_size_bytes,
        extracted_at: Utc::now(),
        columns,
    })
}
