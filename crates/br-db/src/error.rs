//! Error types for br-db

use thiserror::Error;

/// Message fragments (lower-cased) that identify a pre-existing object.
///
/// `duckdb::Error` carries no structured error class for catalog or
/// constraint failures, so this list is the only place that inspects
/// messages. Everything above this crate matches on [`DbError::AlreadyExists`].
const ALREADY_EXISTS_PATTERNS: &[&str] = &[
    "already exists",
    "duplicate key",
    "duplicate column",
    "duplicate entry",
];

/// Database operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Object (table, column, key) already exists (D003)
    #[error("[D003] Object already exists: {0}")]
    AlreadyExists(String),

    /// Table not found (D004)
    #[error("[D004] Table or view not found: {0}")]
    TableNotFound(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// Classify a raw driver message into a [`DbError`] variant.
    pub fn classify(message: impl Into<String>) -> Self {
        let msg = message.into();
        let lower = msg.to_lowercase();
        if ALREADY_EXISTS_PATTERNS.iter().any(|p| lower.contains(p)) {
            DbError::AlreadyExists(msg)
        } else if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }

    /// True when the failure only says the object is already in place.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, DbError::AlreadyExists(_))
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::classify(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_existing_table() {
        let err = DbError::classify("Catalog Error: Table with name \"dms_sites\" already exists!");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_classify_existing_column() {
        let err = DbError::classify("Catalog Error: Column with name vat_id already exists!");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_classify_duplicate_key() {
        let err = DbError::classify(
            "Constraint Error: Duplicate key \"id: 1\" violates primary key constraint.",
        );
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_classify_other_engines() {
        assert!(DbError::classify("ERROR: relation \"t\" already exists").is_already_exists());
        assert!(DbError::classify("Duplicate entry '1' for key 'PRIMARY'").is_already_exists());
        assert!(DbError::classify("Duplicate column name 'x'").is_already_exists());
    }

    #[test]
    fn test_classify_missing_table() {
        let err = DbError::classify("Catalog Error: Table with name dms_sites does not exist!");
        assert!(matches!(err, DbError::TableNotFound(_)));
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_classify_syntax_error() {
        let err = DbError::classify("Parser Error: syntax error at or near \"CREAT\"");
        assert!(matches!(err, DbError::ExecutionError(_)));
    }
}
