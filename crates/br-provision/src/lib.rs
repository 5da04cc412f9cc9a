//! br-provision - Provisioning engine for Bedrock
//!
//! Applies schema units idempotently, verifies their structure and seed data
//! against the live database, and orchestrates runs over a unit registry.

pub mod applier;
pub mod error;
pub mod health;
pub mod orchestrator;
pub mod outcome;
pub mod plan;
mod readiness;
pub mod verifier;

#[cfg(test)]
mod test_support;

pub use applier::{apply, ExecutionReport, StatementFailure};
pub use error::{ProvisionError, ProvisionResult};
pub use health::{check, HealthReport, UnitStatus};
pub use orchestrator::{deploy, Orchestrator, Selection};
pub use outcome::{DeploymentOutcome, DeploymentStatus, UnitOutcome, UnitState};
pub use plan::{plan, PlannedUnit};
pub use verifier::{verify, VerificationResult};
