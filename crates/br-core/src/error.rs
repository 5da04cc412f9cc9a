//! Error types for br-core

use thiserror::Error;

/// Core error type for Bedrock.
///
/// Every variant is a configuration problem: it is detected before any
/// statement touches a database.
#[derive(Error, Debug)]
pub enum CoreError {
    /// B001: Configuration file not found
    #[error("[B001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// B002: Invalid configuration value
    #[error("[B002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// B003: Unit name is not a usable SQL identifier
    #[error("[B003] Invalid unit name '{name}': {reason}")]
    InvalidUnitName { name: String, reason: String },

    /// B004: Unit declared twice
    #[error("[B004] Duplicate schema unit: {name}")]
    DuplicateUnit { name: String },

    /// B005: Dependency references a unit nobody declared
    #[error("[B005] Unit '{unit}' depends on unknown unit '{dependency}'")]
    UnknownDependency { unit: String, dependency: String },

    /// B006: Circular dependency detected
    #[error("[B006] Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// B007: Unit lookup failed
    #[error("[B007] Schema unit not found: {name}")]
    UnitNotFound { name: String },

    /// B008: Unit has neither or both of `script` and `script_file`
    #[error("[B008] Unit '{name}' must define exactly one of `script` or `script_file`")]
    ScriptSource { name: String },

    /// B009: IO error with file path context
    #[error("[B009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// B010: YAML parse error
    #[error("[B010] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
