//! Helpers shared by unit tests.

use br_core::split_statements;
use br_db::Database;

/// Run every statement of `script`, panicking on the first failure.
pub(crate) async fn run_script(db: &dyn Database, script: &str) {
    for statement in split_statements(script) {
        db.execute(&statement)
            .await
            .unwrap_or_else(|e| panic!("{statement}: {e}"));
    }
}
