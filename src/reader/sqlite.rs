//! SQLite-backed column reader.
//!
//! The schema name maps onto SQLite's attached-database name: `main` opens
//! the file directly, any other schema name gets the file attached under
//! that name, so `public.orders` reads `"public"."orders"`.

use std::path::Path;

use rusqlite::Connection;

use crate::error::{ReaderError, ReaderResult};

use super::{ColumnInfo, ColumnReader, ColumnValues};

/// Quote an identifier with double quotes (ANSI style).
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Reads one table from a SQLite database.
#[derive(Debug)]
pub struct SqliteReader {
    conn: Connection,
    schema: String,
    table: String,
}

impl SqliteReader {
    /// Open a database file and bind to one table. A schema other than
    /// `main` attaches the file under that name.
    pub fn open<P: AsRef<Path>>(
        path: P,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> ReaderResult<Self> {
        let schema = schema.into();
        let conn = if schema == "main" {
            Connection::open(path.as_ref())?
        } else {
            let conn = Connection::open_in_memory()?;
            let sql = format!("ATTACH DATABASE ?1 AS {}", quote_ident(&schema));
            let path_str = path.as_ref().to_string_lossy().into_owned();
            conn.execute(&sql, [path_str])?;
            conn
        };
        Self::from_connection(conn, schema, table)
    }

    /// Bind to one table over an existing connection. The schema must be
    /// `main` or the name of an attached database.
    pub fn from_connection(
        conn: Connection,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> ReaderResult<Self> {
        let reader = Self {
            conn,
            schema: schema.into(),
            table: table.into(),
        };
        reader.check_table_exists()?;
        Ok(reader)
    }

    fn qualified_table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    fn check_table_exists(&self) -> ReaderResult<()> {
        let sql = format!(
            "SELECT count(*) FROM {}.sqlite_master WHERE type = 'table' AND name = ?1",
            quote_ident(&self.schema)
        );
        let count: i64 = self
            .conn
            .query_row(&sql, [&self.table], |row| row.get(0))?;
        if count == 0 {
            return Err(ReaderError::TableNotFound(format!(
                "{}.{}",
                self.schema, self.table
            )));
        }
        Ok(())
    }
}

impl ColumnReader for SqliteReader {
    fn row_count(&self) -> ReaderResult<u64> {
        let sql = format!("SELECT count(*) FROM {}", self.qualified_table());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn columns(&self) -> ReaderResult<Vec<ColumnInfo>> {
        let sql = format!(
            "PRAGMA {}.table_info({})",
            quote_ident(&self.schema),
            quote_ident(&self.table)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get("name")?;
            let declared: String = row.get("type")?;
            Ok(ColumnInfo {
                name,
                declared_type: if declared.is_empty() {
                    None
                } else {
                    Some(declared)
                },
            })
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    fn read_column(&self, name: &str) -> ReaderResult<ColumnValues> {
        let known = self.columns()?;
        if !known.iter().any(|c| c.name == name) {
            return Err(ReaderError::ColumnNotFound {
                table: format!("{}.{}", self.schema, self.table),
                column: name.to_string(),
            });
        }

        let sql = format!(
            "SELECT CAST({col} AS TEXT) FROM {table}",
            col = quote_ident(name),
            table = self.qualified_table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, Option<String>>(0))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    /// Sum of page sizes from `dbstat`, when the virtual table is compiled
    /// in. Returns `None` otherwise.
    fn table_size_bytes(&self) -> ReaderResult<Option<u64>> {
        let sql = format!(
            "SELECT sum(pgsize) FROM {}.dbstat WHERE name = ?1",
            quote_ident(&self.schema)
        );
        match self
            .conn
            .query_row(&sql, [&self.table], |row| row.get::<_, Option<i64>>(0))
        {
            Ok(Some(size)) => Ok(Some(size as u64)),
            Ok(None) => Ok(None),
            Err(_) => Ok(None),
        }
    }
}
