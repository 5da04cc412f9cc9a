//! Step orchestrator
//!
//! Drives each selected unit through dependency check, apply, and
//! verification, in topological order, halting at the first failed unit.

use crate::applier::{apply, ExecutionReport};
use crate::error::ProvisionError;
use crate::outcome::{DeploymentOutcome, UnitOutcome, UnitState};
use crate::readiness::ReadinessTracker;
use crate::verifier::{verify, VerificationResult};
use br_core::{SchemaUnit, UnitRegistry};
use br_db::{Database, DbResult};

/// Which units a run covers.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Unit names; empty means every registered unit
    pub units: Vec<String>,

    /// Also include transitive dependencies of the named units
    pub with_dependencies: bool,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            units: units.into_iter().map(Into::into).collect(),
            with_dependencies: false,
        }
    }

    pub fn with_dependencies(mut self) -> Self {
        self.with_dependencies = true;
        self
    }

    /// Resolve against `registry`, in topological order.
    pub fn resolve<'r>(
        &self,
        registry: &'r UnitRegistry,
    ) -> Result<Vec<&'r SchemaUnit>, ProvisionError> {
        Ok(registry.select(&self.units, self.with_dependencies)?)
    }
}

/// One unit moving through its lifecycle.
struct UnitRun<'u> {
    unit: &'u SchemaUnit,
    state: UnitState,
}

impl<'u> UnitRun<'u> {
    fn new(unit: &'u SchemaUnit) -> Self {
        Self {
            unit,
            state: UnitState::Pending,
        }
    }

    fn advance(&mut self, next: UnitState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        log::debug!("{}: {} -> {}", self.unit.name(), self.state, next);
        self.state = next;
    }

    fn fail(
        mut self,
        error: ProvisionError,
        execution: Option<ExecutionReport>,
        verification: Option<VerificationResult>,
    ) -> UnitOutcome {
        let failed_at = self.state;
        self.advance(UnitState::Failed);
        UnitOutcome {
            unit: self.unit.name().clone(),
            state: UnitState::Failed,
            failed_at: Some(failed_at),
            execution,
            verification,
            error: Some(error),
        }
    }

    fn pass(mut self, execution: ExecutionReport, verification: VerificationResult) -> UnitOutcome {
        self.advance(UnitState::Passed);
        UnitOutcome {
            unit: self.unit.name().clone(),
            state: UnitState::Passed,
            failed_at: None,
            execution: Some(execution),
            verification: Some(verification),
            error: None,
        }
    }
}

/// Runs units from a registry against a database handle.
pub struct Orchestrator<'a> {
    registry: &'a UnitRegistry,
}

impl<'a> Orchestrator<'a> {
    pub fn new(registry: &'a UnitRegistry) -> Self {
        Self { registry }
    }

    /// Run `units` (already in topological order) against `db`.
    ///
    /// Units are processed strictly one at a time. The first unit that fails
    /// its dependency check or its verification halts the run; the rest are
    /// listed in `not_attempted`.
    pub async fn run(&self, units: &[&SchemaUnit], db: &dyn Database) -> DeploymentOutcome {
        let mut outcome = DeploymentOutcome::begin();
        let mut tracker = ReadinessTracker::new(self.registry);

        log::info!(
            "Provisioning {} unit(s) on {} (run {})",
            units.len(),
            db.db_type(),
            outcome.run_id
        );

        for (position, unit) in units.iter().enumerate() {
            let unit_outcome = self.run_unit(unit, db, &mut tracker).await;
            let halted = unit_outcome.error.clone();
            outcome.units.push(unit_outcome);

            if let Some(error) = halted {
                log::error!("{error}");
                outcome.not_attempted = units[position + 1..]
                    .iter()
                    .map(|u| u.name().clone())
                    .collect();
                outcome.error = Some(error);
                break;
            }
        }

        let outcome = outcome.finish();
        log::info!(
            "Run {} finished: {} ({} unit(s) attempted)",
            outcome.run_id,
            outcome.status,
            outcome.units.len()
        );
        outcome
    }

    async fn run_unit(
        &self,
        unit: &SchemaUnit,
        db: &dyn Database,
        tracker: &mut ReadinessTracker<'_>,
    ) -> UnitOutcome {
        let mut run = UnitRun::new(unit);

        run.advance(UnitState::DependencyCheck);
        match tracker.first_unmet(unit, db).await {
            Ok(None) => {}
            Ok(Some(unmet)) => return run.fail(unmet.into_error(unit.name()), None, None),
            Err(e) => return run.fail(e, None, None),
        }

        run.advance(UnitState::Applying);
        let statements = unit.statements();
        let execution = apply(&statements, db).await;
        log::info!(
            "{}: {} executed, {} skipped, {} errored",
            unit.name(),
            execution.executed,
            execution.skipped,
            execution.errored
        );

        run.advance(UnitState::Verifying);
        let verification = match verify(unit, db).await {
            Ok(result) => result,
            Err(e) => {
                let error = ProvisionError::database(unit.name(), e);
                return run.fail(error, Some(execution), None);
            }
        };
        tracker.record(verification.clone());

        if verification.passed() {
            run.pass(execution, verification)
        } else {
            let error = ProvisionError::VerificationMismatch {
                unit: unit.name().clone(),
                result: verification.clone(),
            };
            run.fail(error, Some(execution), Some(verification))
        }
    }
}

/// Provision `selection` from `registry` on a handle obtained from `connect`.
///
/// The handle lives only for the duration of the run and is released on
/// every path. Selection and connection problems yield an aborted outcome
/// with no units attempted.
pub async fn deploy<F>(
    registry: &UnitRegistry,
    selection: &Selection,
    connect: F,
) -> DeploymentOutcome
where
    F: FnOnce() -> DbResult<Box<dyn Database>>,
{
    let units = match selection.resolve(registry) {
        Ok(units) => units,
        Err(e) => return DeploymentOutcome::aborted(e),
    };

    let db = match connect() {
        Ok(db) => db,
        Err(e) => {
            return DeploymentOutcome::aborted(ProvisionError::Connection {
                message: e.to_string(),
            })
        }
    };

    Orchestrator::new(registry).run(&units, db.as_ref()).await
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
