//! Database handle trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database handle used by the provisioning engine.
///
/// Implementations must be Send + Sync for async operation. Every method
/// except [`execute`](Database::execute) is read-only.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one statement, returning affected rows.
    ///
    /// Failures are classified: a pre-existing object surfaces as
    /// [`DbError::AlreadyExists`](crate::DbError::AlreadyExists).
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Column names of a table, in ordinal order. Empty if the table is absent.
    async fn table_columns(&self, name: &str) -> DbResult<Vec<String>>;

    /// Count rows in `table`, optionally restricted by a SQL `filter` expression.
    async fn count_rows(&self, table: &str, filter: Option<&str>) -> DbResult<usize>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
