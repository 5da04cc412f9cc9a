//! Per-unit and per-run results.

use crate::applier::ExecutionReport;
use crate::error::ProvisionError;
use crate::verifier::VerificationResult;
use br_core::UnitName;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Lifecycle of one unit within a run.
///
/// `Pending -> DependencyCheck -> Applying -> Verifying -> Passed`, with
/// `Failed` reachable from `DependencyCheck` and `Verifying`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    Pending,
    DependencyCheck,
    Applying,
    Verifying,
    Passed,
    Failed,
}

impl UnitState {
    pub fn can_transition_to(self, next: UnitState) -> bool {
        use UnitState::*;
        matches!(
            (self, next),
            (Pending, DependencyCheck)
                | (DependencyCheck, Applying)
                | (DependencyCheck, Failed)
                | (Applying, Verifying)
                | (Verifying, Passed)
                | (Verifying, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, UnitState::Passed | UnitState::Failed)
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitState::Pending => write!(f, "pending"),
            UnitState::DependencyCheck => write!(f, "dependency_check"),
            UnitState::Applying => write!(f, "applying"),
            UnitState::Verifying => write!(f, "verifying"),
            UnitState::Passed => write!(f, "passed"),
            UnitState::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal record for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitOutcome {
    pub unit: UnitName,

    /// `Passed` or `Failed`
    pub state: UnitState,

    /// Stage the unit was in when it failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<UnitState>,

    /// Absent when the unit never reached `Applying`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution: Option<ExecutionReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProvisionError>,
}

impl UnitOutcome {
    pub fn passed(&self) -> bool {
        self.state == UnitState::Passed
    }
}

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    /// Every unit passed and no statement errored
    Success,
    /// Every unit passed, but some statements errored
    Partial,
    /// A unit failed, or the run never started
    Failed,
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStatus::Success => write!(f, "success"),
            DeploymentStatus::Partial => write!(f, "partial"),
            DeploymentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentOutcome {
    pub run_id: Uuid,
    pub status: DeploymentStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Units that were attempted, in execution order
    pub units: Vec<UnitOutcome>,

    /// Selected units never attempted because the run halted
    pub not_attempted: Vec<UnitName>,

    /// Error that halted the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProvisionError>,
}

impl DeploymentOutcome {
    pub(crate) fn begin() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            status: DeploymentStatus::Success,
            started_at: now,
            finished_at: now,
            units: Vec::new(),
            not_attempted: Vec::new(),
            error: None,
        }
    }

    /// A run that failed before any unit was attempted.
    pub fn aborted(error: ProvisionError) -> Self {
        let mut outcome = Self::begin();
        outcome.error = Some(error);
        outcome.finish()
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self.status = if self.error.is_some() || self.units.iter().any(|u| !u.passed()) {
            DeploymentStatus::Failed
        } else if self.units.iter().any(|u| {
            u.execution
                .as_ref()
                .is_some_and(ExecutionReport::has_errors)
        }) {
            DeploymentStatus::Partial
        } else {
            DeploymentStatus::Success
        };
        self
    }

    pub fn unit(&self, name: &str) -> Option<&UnitOutcome> {
        self.units.iter().find(|u| u.unit.as_str() == name)
    }

    /// The unit that halted the run, if any.
    pub fn failed_unit(&self) -> Option<&UnitOutcome> {
        self.units.iter().find(|u| !u.passed())
    }

    /// Statement counts summed across all attempted units.
    pub fn totals(&self) -> ExecutionReport {
        let mut totals = ExecutionReport::default();
        for report in self.units.iter().filter_map(|u| u.execution.as_ref()) {
            totals.absorb(report);
        }
        totals
    }

    pub fn duration_secs(&self) -> f64 {
        (self.finished_at - self.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
#[path = "outcome_test.rs"]
mod tests;
