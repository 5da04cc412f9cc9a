//! Idempotent applier
//!
//! Executes a unit's statements in order. A statement whose object already
//! exists is skipped; any other failure is recorded and the remaining
//! statements still run.

use br_db::{Database, DbError};
use serde::Serialize;

/// A statement that failed for a reason other than "already exists".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementFailure {
    /// Position of the statement within the unit (0-based)
    pub index: usize,
    pub statement: String,
    pub message: String,
}

/// Per-statement accounting for one apply pass.
///
/// `executed + skipped + errored` always equals the number of statements
/// submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub executed: usize,
    pub skipped: usize,
    pub errored: usize,
    pub failures: Vec<StatementFailure>,
}

impl ExecutionReport {
    pub fn total(&self) -> usize {
        self.executed + self.skipped + self.errored
    }

    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }

    /// Fold another report's counts into this one.
    pub fn absorb(&mut self, other: &ExecutionReport) {
        self.executed += other.executed;
        self.skipped += other.skipped;
        self.errored += other.errored;
        self.failures.extend(other.failures.iter().cloned());
    }
}

/// Execute `statements` in order against `db`.
///
/// Never aborts early and never returns an error; every outcome lands in
/// the report.
pub async fn apply<S: AsRef<str>>(statements: &[S], db: &dyn Database) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for (index, statement) in statements.iter().enumerate() {
        let sql = statement.as_ref();
        match db.execute(sql).await {
            Ok(_) => report.executed += 1,
            Err(DbError::AlreadyExists(msg)) => {
                log::debug!("statement {index} skipped, object already exists: {msg}");
                report.skipped += 1;
            }
            Err(e) => {
                log::warn!("statement {index} failed: {e}");
                report.errored += 1;
                report.failures.push(StatementFailure {
                    index,
                    statement: sql.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
