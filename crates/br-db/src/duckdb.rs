//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use br_core::sql::{quote_qualified, split_qualified_name};
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        log::debug!("duckdb execute: {sql}");
        conn.execute(sql, []).map_err(DbError::from)
    }

    /// Check if relation exists synchronously
    ///
    /// Names match case-insensitively, as DuckDB resolves unquoted identifiers.
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?)",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(DbError::from)?;
        Ok(count > 0)
    }

    /// Fetch column names synchronously
    fn table_columns_sync(&self, name: &str) -> DbResult<Vec<String>> {
        let conn = self.lock()?;
        let (schema, table) = split_qualified_name(name);
        let mut stmt = conn
            .prepare(
                "SELECT column_name FROM information_schema.columns \
                 WHERE lower(table_schema) = lower(?) AND lower(table_name) = lower(?) \
                 ORDER BY ordinal_position",
            )
            .map_err(DbError::from)?;
        let columns = stmt
            .query_map(duckdb::params![schema, table], |row| row.get::<_, String>(0))
            .map_err(DbError::from)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::from)?;
        Ok(columns)
    }

    /// Count rows synchronously
    fn count_rows_sync(&self, table: &str, filter: Option<&str>) -> DbResult<usize> {
        let sql = match filter {
            Some(filter) => format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                quote_qualified(table),
                filter
            ),
            None => format!("SELECT COUNT(*) FROM {}", quote_qualified(table)),
        };
        self.scalar_count(&sql)
    }

    fn scalar_count(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(DbError::from)?;
        Ok(count as usize)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    async fn table_columns(&self, name: &str) -> DbResult<Vec<String>> {
        self.table_columns_sync(name)
    }

    async fn count_rows(&self, table: &str, filter: Option<&str>) -> DbResult<usize> {
        self.count_rows_sync(table, filter)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
