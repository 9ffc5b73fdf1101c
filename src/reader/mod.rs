//! Column readers: how the pipeline sees a source table.
//!
//! `ColumnReader` is the seam between the inference engine and whatever
//! holds the data. `SqliteReader` reads real tables; `MemoryReader` feeds
//! fixtures to tests and doubles as the embedding API for callers that
//! already have values in memory.
//!
//! Values cross the seam as nullable text. Typed interpretation is the
//! classifier's and profilers' job, not the reader's.

mod sqlite;

pub use sqlite::SqliteReader;

use crate::error::{ReaderError, ReaderResult};

/// One column's values, null-preserving, in row order.
pub type ColumnValues = Vec<Option<String>>;

/// A column's name and declared storage type, in physical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared SQL type, when the source schema has one.
    pub declared_type: Option<String>,
}

/// Read access to one source table.
pub trait ColumnReader {
    /// Total row count of the table.
    fn row_count(&self) -> ReaderResult<u64>;

    /// Columns in physical order.
    fn columns(&self) -> ReaderResult<Vec<ColumnInfo>>;

    /// All values of one column, in row order, nulls preserved.
    fn read_column(&self, name: &str) -> ReaderResult<ColumnValues>;

    /// On-disk size of the table in bytes, when the source can tell.
    fn table_size_bytes(&self) -> ReaderResult<Option<u64>> {
        Ok(None)
    }
}

/// In-memory reader over fixture columns.
#[derive(Debug, Clone, Default)]
pub struct MemoryReader {
    table: String,
    columns: Vec<(ColumnInfo, ColumnValues)>,
}

impl MemoryReader {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
        }
    }

    pub fn with_column(
        mut self,
        name: impl Into<String>,
        declared_type: Option<&str>,
        values: Vec<Option<String>>,
    ) -> Self {
        self.columns.push((
            ColumnInfo {
                name: name.into(),
                declared_type: declared_type.map(str::to_string),
            },
            values,
        ));
        self
    }

    /// Convenience for string literals: `Some("a")` rows and `None` nulls.
    pub fn with_str_column(
        self,
        name: impl Into<String>,
        values: Vec<Option<&str>>,
    ) -> Self {
        self.with_column(
            name,
            None,
            values.into_iter().map(|v| v.map(str::to_string)).collect(),
        )
    }
}

impl ColumnReader for MemoryReader {
    fn row_count(&self) -> ReaderResult<u64> {
        Ok(self
            .columns
            .iter()
            .map(|(_, values)| values.len() as u64)
            .max()
            .unwrap_or(0))
    }

    fn columns(&self) -> ReaderResult<Vec<ColumnInfo>> {
        Ok(self.columns.iter().map(|(info, _)| info.clone()).collect())
    }

    fn read_column(&self, name: &str) -> ReaderResult<ColumnValues> {
        self.columns
            .iter()
            .find(|(info, _)| info.name == name)
            .map(|(_, values)| values.clone())
            .ok_or_else(|| ReaderError::ColumnNotFound {
                table: self.table.clone(),
                column: name.to_string(),
            })
    }
}
