//! Error taxonomy for provisioning runs.

use crate::verifier::VerificationResult;
use br_core::{CoreError, UnitName};
use br_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Why a provisioning run (or a unit within it) stopped.
///
/// Statement failures are not in this enum: the applier collects them in
/// its [`ExecutionReport`](crate::applier::ExecutionReport) and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisionError {
    /// Bad unit graph or configuration (P001). Fatal before any unit runs.
    #[error("[P001] Configuration error: {message}")]
    Configuration { message: String },

    /// The database handle could not be obtained (P002). Fatal before any unit runs.
    #[error("[P002] Database connection failed: {message}")]
    Connection { message: String },

    /// A prerequisite unit is not in place (P003). Nothing was applied for `unit`.
    #[error("[P003] Unit '{unit}' cannot run: dependency '{dependency}' is not provisioned{}", blocked_suffix(.blocked_by))]
    DependencyUnmet {
        unit: UnitName,
        dependency: UnitName,
        /// Deeper prerequisite that kept `dependency` from being checked
        blocked_by: Option<UnitName>,
        /// Live state of `dependency`, when it could be checked
        result: Option<VerificationResult>,
    },

    /// Expected structure or baseline data is absent after apply (P004).
    #[error("[P004] Unit '{unit}' failed verification: {result}")]
    VerificationMismatch {
        unit: UnitName,
        result: VerificationResult,
    },

    /// A read-only verification query failed (P005).
    #[error("[P005] Verification query for '{unit}' failed: {message}")]
    Database { unit: UnitName, message: String },
}

fn blocked_suffix(blocked_by: &Option<UnitName>) -> String {
    match blocked_by {
        Some(root) => format!(" (blocked by '{root}')"),
        None => String::new(),
    }
}

/// Result type alias for ProvisionError
pub type ProvisionResult<T> = Result<T, ProvisionError>;

impl ProvisionError {
    pub(crate) fn database(unit: &UnitName, err: DbError) -> Self {
        ProvisionError::Database {
            unit: unit.clone(),
            message: err.to_string(),
        }
    }

    /// True for errors that stop a run before any unit is attempted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ProvisionError::Configuration { .. } | ProvisionError::Connection { .. }
        )
    }

    /// Unit the error is attributed to, if any.
    pub fn unit(&self) -> Option<&UnitName> {
        match self {
            ProvisionError::Configuration { .. } | ProvisionError::Connection { .. } => None,
            ProvisionError::DependencyUnmet { unit, .. }
            | ProvisionError::VerificationMismatch { unit, .. }
            | ProvisionError::Database { unit, .. } => Some(unit),
        }
    }
}

impl From<CoreError> for ProvisionError {
    fn from(err: CoreError) -> Self {
        ProvisionError::Configuration {
            message: err.to_string(),
        }
    }
}
