//! br-core - Core library for Bedrock
//!
//! This crate provides schema unit declarations, configuration parsing, the
//! dependency registry, statement splitting, and the built-in master-data
//! catalog. Nothing in here touches a database.

pub mod catalog;
pub mod checksum;
pub mod config;
pub mod error;
pub mod registry;
pub mod sql;
pub mod unit;
pub mod unit_name;

pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, DbType};
pub use error::{CoreError, CoreResult};
pub use registry::UnitRegistry;
pub use sql::split_statements;
pub use unit::{SchemaUnit, SeedRequirement, UnitCategory};
pub use unit_name::UnitName;
