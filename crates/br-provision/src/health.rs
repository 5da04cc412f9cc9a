//! Read-only health check over a selection of units.

use crate::error::ProvisionResult;
use crate::readiness::{Readiness, ReadinessTracker};
use br_core::{SchemaUnit, UnitCategory, UnitName, UnitRegistry};
use br_db::Database;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status row for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitStatus {
    pub unit: UnitName,
    pub table: UnitName,
    pub category: UnitCategory,
    pub exists: bool,
    pub missing_columns: Vec<String>,
    pub row_count: Option<usize>,
    pub required_minimum: Option<usize>,

    /// Set when the unit was not checked because a prerequisite is missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<UnitName>,

    /// Set when a verification query for the unit failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub healthy: bool,
}

impl UnitStatus {
    fn from_readiness(unit: &SchemaUnit, readiness: Readiness) -> Self {
        match readiness {
            Readiness::Verified(result) => Self {
                unit: unit.name().clone(),
                table: unit.table().clone(),
                category: unit.category(),
                healthy: result.passed(),
                exists: result.exists,
                missing_columns: result.missing_columns,
                row_count: result.row_count,
                required_minimum: result.required_minimum,
                blocked_by: None,
                error: None,
            },
            Readiness::Blocked { by } => Self {
                unit: unit.name().clone(),
                table: unit.table().clone(),
                category: unit.category(),
                exists: false,
                missing_columns: Vec::new(),
                row_count: None,
                required_minimum: unit.seed().map(|s| s.min_rows),
                blocked_by: Some(by),
                error: None,
                healthy: false,
            },
            Readiness::Unverifiable { message } => Self {
                unit: unit.name().clone(),
                table: unit.table().clone(),
                category: unit.category(),
                exists: false,
                missing_columns: Vec::new(),
                row_count: None,
                required_minimum: unit.seed().map(|s| s.min_rows),
                blocked_by: None,
                error: Some(message),
                healthy: false,
            },
        }
    }
}

/// Health of a selection of units at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub checked_at: DateTime<Utc>,
    pub units: Vec<UnitStatus>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.units.iter().all(|u| u.healthy)
    }

    pub fn unhealthy(&self) -> impl Iterator<Item = &UnitStatus> {
        self.units.iter().filter(|u| !u.healthy)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitStatus> {
        self.units.iter().find(|u| u.unit.as_str() == name)
    }
}

/// Verify `units` (in topological order) without modifying anything.
///
/// A unit whose prerequisites are missing is reported as blocked rather
/// than verified. A failed verification query marks only that unit (and
/// its dependents) unhealthy; the rest of the report is still produced.
pub async fn check(
    registry: &UnitRegistry,
    units: &[&SchemaUnit],
    db: &dyn Database,
) -> ProvisionResult<HealthReport> {
    let mut tracker = ReadinessTracker::new(registry);
    let mut statuses = Vec::with_capacity(units.len());

    for unit in units {
        let readiness = tracker.resolve(unit.name(), db).await?;
        let status = UnitStatus::from_readiness(unit, readiness);
        if !status.healthy {
            log::warn!("{} is not healthy", status.unit);
        }
        statuses.push(status);
    }

    Ok(HealthReport {
        checked_at: Utc::now(),
        units: statuses,
    })
}

#[cfg(test)]
#[path = "health_test.rs"]
mod tests;
