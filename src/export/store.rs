//! Normalized metadata store over SQLite.
//!
//! One snapshot is one `data_table` row, one `column_info` row per column,
//! and one type-specific row (or N `code_frequency` rows) per column.
//! Snapshots are keyed by `(schema_name, table_name, extracted_at)`:
//! re-running a table creates a new snapshot, replaying the same snapshot
//! key replaces it in place. The whole snapshot is written inside a single
//! transaction.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::error::{ExportError, ExportResult};
use crate::model::{ColumnStats, TableMetadata};

const STORE_VERSION: i32 = 1;

/// Handle to the metadata store database.
pub struct MetadataStore {
    conn: Connection,
    updated_by: String,
}

/// One `data_table` row, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    pub data_table_id: i64,
    pub schema_name: String,
    pub table_name: String,
    pub number_rows: u64,
    pub number_columns: u64,
    pub extracted_at: String,
    pub updated_by: String,
}

/// One `column_info` row, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub column_id: i64,
    pub column_name: String,
    pub ordinal: u64,
    pub declared_type: Option<String>,
    pub semantic_type: String,
    pub override_applied: bool,
    pub null_count: u64,
    pub distinct_count: u64,
}

impl MetadataStore {
    /// Open (creating if needed) the store at the configured path.
    pub fn open(config: &StoreConfig) -> ExportResult<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&config.path)?;
        Self::from_connection(conn, &config.updated_by)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory(updated_by: impl Into<String>) -> ExportResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, updated_by)
    }

    fn from_connection(conn: Connection, updated_by: impl Into<String>) -> ExportResult<Self> {
        let store = Self {
            conn,
            updated_by: updated_by.into(),
        };
        store.init()?;
        Ok(store)
    }

    /// Initialize the store schema and check version.
    fn init(&self) -> ExportResult<()> {
        self.conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS data_table (
                data_table_id INTEGER PRIMARY KEY AUTOINCREMENT,
                schema_name TEXT NOT NULL,
                table_name TEXT NOT NULL,
                number_rows INTEGER NOT NULL,
                number_columns INTEGER NOT NULL,
                size_bytes INTEGER,
                extracted_at TEXT NOT NULL,
                updated_by TEXT NOT NULL,
                UNIQUE (schema_name, table_name, extracted_at)
            );

            CREATE TABLE IF NOT EXISTS column_info (
                column_id INTEGER PRIMARY KEY AUTOINCREMENT,
                data_table_id INTEGER NOT NULL
                    REFERENCES data_table(data_table_id) ON DELETE CASCADE,
                column_name TEXT NOT NULL,
                ordinal INTEGER NOT NULL,
                declared_type TEXT,
                semantic_type TEXT NOT NULL,
                override_applied INTEGER NOT NULL,
                null_count INTEGER NOT NULL,
                distinct_count INTEGER NOT NULL,
                UNIQUE (data_table_id, column_name)
            );

            CREATE TABLE IF NOT EXISTS numeric_column (
                column_id INTEGER PRIMARY KEY
                    REFERENCES column_info(column_id) ON DELETE CASCADE,
                minimum REAL,
                maximum REAL,
                mean REAL,
                stddev REAL,
                q1 REAL,
                median REAL,
                q3 REAL
            );

            CREATE TABLE IF NOT EXISTS text_column (
                column_id INTEGER PRIMARY KEY
                    REFERENCES column_info(column_id) ON DELETE CASCADE,
                min_length INTEGER,
                max_length INTEGER,
                median_length REAL
            );

            CREATE TABLE IF NOT EXISTS date_column (
                column_id INTEGER PRIMARY KEY
                    REFERENCES column_info(column_id) ON DELETE CASCADE,
                min_date TEXT NOT NULL,
                max_date TEXT NOT NULL,
                date_format TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS code_frequency (
                column_id INTEGER NOT NULL
                    REFERENCES column_info(column_id) ON DELETE CASCADE,
                code TEXT NOT NULL,
                frequency INTEGER NOT NULL,
                PRIMARY KEY (column_id, code)
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stored_version: Option<i32> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                let s: String = row.get(0)?;
                Ok(s.parse().unwrap_or(0))
            })
            .optional()?;

        match stored_version {
            Some(v) if v == STORE_VERSION => {}
            Some(_) => {
                // Snapshots are derived data; a version bump rebuilds them
                self.clear_all()?;
                self.set_version()?;
            }
            None => {
                self.set_version()?;
            }
        }

        Ok(())
    }

    fn set_version(&self) -> ExportResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
            params![STORE_VERSION.to_string()],
        )?;
        Ok(())
    }

    fn clear_all(&self) -> ExportResult<()> {
        self.conn.execute_batch(
            "
            DELETE FROM code_frequency;
            DELETE FROM date_column;
            DELETE FROM text_column;
            DELETE FROM numeric_column;
            DELETE FROM column_info;
            DELETE FROM data_table;
            ",
        )?;
        Ok(())
    }

    /// Record one table snapshot. Replaying the same
    /// `(schema, table, extracted_at)` key replaces the previous rows, so
    /// the operation is idempotent per snapshot.
    pub fn record_snapshot(&mut self, metadata: &TableMetadata) -> ExportResult<i64> {
        let tx = self.conn.transaction()?;
        let extracted_at = metadata.extracted_at.to_rfc3339();

        tx.execute(
            "DELETE FROM data_table
             WHERE schema_name = ?1 AND table_name = ?2 AND extracted_at = ?3",
            params![metadata.schema_name, metadata.table_name, extracted_at],
        )?;

        tx.execute(
            "INSERT INTO data_table
                (schema_name, table_name, number_rows, number_columns,
                 size_bytes, extracted_at, updated_by)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                metadata.schema_name,
                metadata.table_name,
                metadata.row_count as i64,
                metadata.column_count as i64,
                metadata.table_size_bytes.map(|s| s as i64),
                extracted_at,
                self.updated_by,
            ],
        )?;
        let data_table_id = tx.last_insert_rowid();

        for (ordinal, column) in metadata.columns.iter().enumerate() {
            tx.execute(
                "INSERT INTO column_info
                    (data_table_id, column_name, ordinal, declared_type,
                     semantic_type, override_applied, null_count, distinct_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    data_table_id,
                    column.name,
                    ordinal as i64,
                    column.declared_type,
                    column.semantic_type().as_str(),
                    column.override_applied,
                    column.null_count as i64,
                    column.distinct_count as i64,
                ],
            )?;
            let column_id = tx.last_insert_rowid();

            match &column.stats {
                ColumnStats::Text(stats) => {
                    tx.execute(
                        "INSERT INTO text_column
                            (column_id, min_length, max_length, median_length)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![
                            column_id,
                            stats.min_length.map(|v| v as i64),
                            stats.max_length.map(|v| v as i64),
                            stats.median_length,
                        ],
                    )?;
                }
                ColumnStats::Code(stats) => {
                    for entry in &stats.values {
                        tx.execute(
                            "INSERT INTO code_frequency (column_id, code, frequency)
                             VALUES (?1, ?2, ?3)",
                            params![column_id, entry.value, entry.frequency as i64],
                        )?;
                    }
                }
                ColumnStats::Numeric(stats) => {
                    let quartiles = stats.quartiles.as_ref();
                    tx.execute(
                        "INSERT INTO numeric_column
                            (column_id, minimum, maximum, mean, stddev, q1, median, q3)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            column_id,
                            stats.min,
                            stats.max,
                            stats.mean,
                            stats.stddev,
                            quartiles.map(|q| q.q1),
                            quartiles.map(|q| q.median),
                            quartiles.map(|q| q.q3),
                        ],
                    )?;
                }
                ColumnStats::Date(stats) => {
                    tx.execute(
                        "INSERT INTO date_column
                            (column_id, min_date, max_date, date_format)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![
                            column_id,
                            stats.min_date.to_string(),
                            stats.max_date.to_string(),
                            stats.format,
                        ],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(data_table_id)
    }

    /// All snapshots recorded for one table, oldest first.
    pub fn snapshots(&self, schema: &str, table: &str) -> ExportResult<Vec<SnapshotInfo>> {
        let mut stmt = self.conn.prepare(
            "SELECT data_table_id, schema_name, table_name, number_rows,
                    number_columns, extracted_at, updated_by
             FROM data_table
             WHERE schema_name = ?1 AND table_name = ?2
             ORDER BY extracted_at",
        )?;
        let rows = stmt.query_map(params![schema, table], |row| {
            Ok(SnapshotInfo {
                data_table_id: row.get(0)?,
                schema_name: row.get(1)?,
                table_name: row.get(2)?,
                number_rows: row.get::<_, i64>(3)? as u64,
                number_columns: row.get::<_, i64>(4)? as u64,
                extracted_at: row.get(5)?,
                updated_by: row.get(6)?,
            })
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?);
        }
        Ok(snapshots)
    }

    /// Column rows of one snapshot, in ordinal order.
    pub fn columns(&self, data_table_id: i64) -> ExportResult<Vec<ColumnRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT column_id, column_name, ordinal, declared_type,
                    semantic_type, override_applied, null_count, distinct_count
             FROM column_info
             WHERE data_table_id = ?1
             ORDER BY ordinal",
        )?;
        let rows = stmt.query_map(params![data_table_id], |row| {
            Ok(ColumnRow {
                column_id: row.get(0)?,
                column_name: row.get(1)?,
                ordinal: row.get::<_, i64>(2)? as u64,
                declared_type: row.get(3)?,
                semantic_type: row.get(4)?,
                override_applied: row.get(5)?,
                null_count: row.get::<_, i64>(6)? as u64,
                distinct_count: row.get::<_, i64>(7)? as u64,
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Frequency rows of one categorical column, ascending by code.
    pub fn code_frequencies(&self, column_id: i64) -> ExportResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT code, frequency FROM code_frequency
             WHERE column_id = ?1 ORDER BY code",
        )?;
        let rows = stmt.query_map(params![column_id], |row| {
            Ok((row.get(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut frequencies = Vec::new();
        for row in rows {
            frequencies.push(row?);
        }
        Ok(frequencies)
    }

    /// The latest snapshot for one table, if any.
    pub fn latest_snapshot(&self, schema: &str, table: &str) -> ExportResult<SnapshotInfo> {
        self.snapshots(schema, table)?
            .pop()
            .ok_or_else(|| ExportError::SnapshotNotFound(format!("{}.{}", schema, table)))
    }
}
