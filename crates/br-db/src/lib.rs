//! br-db - Database handle abstraction for Bedrock
//!
//! This crate provides the `Database` trait consumed by the provisioning
//! engine and its DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;

use br_core::config::{DatabaseConfig, DbType};

/// Open a database handle for `config`.
pub fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Database>> {
    log::debug!("Connecting to {} database at {}", config.db_type, config.path);
    match config.db_type {
        DbType::DuckDb => Ok(Box::new(DuckDbBackend::new(&config.path)?)),
    }
}
