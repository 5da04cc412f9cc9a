//! Dependency readiness tracking shared by deploy and health checks.

use crate::error::{ProvisionError, ProvisionResult};
use crate::verifier::{verify, VerificationResult};
use br_core::{SchemaUnit, UnitName, UnitRegistry};
use br_db::Database;
use std::collections::HashMap;

/// What is known about a unit during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Readiness {
    /// Verified against the live database
    Verified(VerificationResult),
    /// Not checked because a prerequisite is missing
    Blocked { by: UnitName },
    /// A verification query failed
    Unverifiable { message: String },
}

impl Readiness {
    /// Dependents may proceed.
    pub(crate) fn is_ready(&self) -> bool {
        matches!(self, Readiness::Verified(r) if r.is_structurally_sound())
    }
}

/// A direct dependency of a unit that is not in place.
#[derive(Debug, Clone)]
pub(crate) struct UnmetDependency {
    pub dependency: UnitName,
    pub readiness: Readiness,
}

impl UnmetDependency {
    pub(crate) fn into_error(self, unit: &UnitName) -> ProvisionError {
        let (blocked_by, result) = match self.readiness {
            Readiness::Verified(result) => (None, Some(result)),
            Readiness::Blocked { by } => (Some(by), None),
            Readiness::Unverifiable { .. } => (None, None),
        };
        ProvisionError::DependencyUnmet {
            unit: unit.clone(),
            dependency: self.dependency,
            blocked_by,
            result,
        }
    }
}

/// Memoizes verification results so each unit is checked at most once,
/// and never before its own dependencies.
pub(crate) struct ReadinessTracker<'a> {
    registry: &'a UnitRegistry,
    known: HashMap<UnitName, Readiness>,
}

impl<'a> ReadinessTracker<'a> {
    pub(crate) fn new(registry: &'a UnitRegistry) -> Self {
        Self {
            registry,
            known: HashMap::new(),
        }
    }

    /// Record a fresh verification result, replacing anything known.
    pub(crate) fn record(&mut self, result: VerificationResult) {
        self.known
            .insert(result.unit.clone(), Readiness::Verified(result));
    }

    /// First direct dependency of `unit` that is a blocker, resolving
    /// unknown ones against the live database in topological order.
    pub(crate) async fn first_unmet(
        &mut self,
        unit: &SchemaUnit,
        db: &dyn Database,
    ) -> ProvisionResult<Option<UnmetDependency>> {
        for dependency in unit.depends_on() {
            match self.resolve(dependency, db).await? {
                Readiness::Unverifiable { message } => {
                    return Err(ProvisionError::Database {
                        unit: dependency.clone(),
                        message,
                    });
                }
                readiness if !readiness.is_ready() => {
                    return Ok(Some(UnmetDependency {
                        dependency: dependency.clone(),
                        readiness,
                    }));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    /// Readiness of `name`, checking its ancestors first where unknown.
    ///
    /// A failed verification query is recorded as `Unverifiable` for that
    /// unit; its dependents are then blocked by it.
    pub(crate) async fn resolve(
        &mut self,
        name: &UnitName,
        db: &dyn Database,
    ) -> ProvisionResult<Readiness> {
        if let Some(known) = self.known.get(name) {
            return Ok(known.clone());
        }

        let mut chain = self.registry.ancestors(name)?;
        chain.push(name.clone());

        for member in chain {
            if self.known.contains_key(&member) {
                continue;
            }
            let unit = self
                .registry
                .get(&member)
                .ok_or_else(|| ProvisionError::Configuration {
                    message: format!("unit '{member}' is not registered"),
                })?;

            let readiness = match self.blocker_of(unit) {
                Some(by) => Readiness::Blocked { by },
                None => match verify(unit, db).await {
                    Ok(result) => Readiness::Verified(result),
                    Err(e) => {
                        log::warn!("could not verify {}: {}", member, e);
                        Readiness::Unverifiable {
                            message: e.to_string(),
                        }
                    }
                },
            };
            self.known.insert(member, readiness);
        }

        self.known
            .get(name)
            .cloned()
            .ok_or_else(|| ProvisionError::Configuration {
                message: format!("unit '{name}' could not be resolved"),
            })
    }

    /// Root prerequisite keeping `unit` from being checked, if any.
    fn blocker_of(&self, unit: &SchemaUnit) -> Option<UnitName> {
        unit.depends_on().iter().find_map(|dep| match self.known.get(dep) {
            Some(Readiness::Blocked { by }) => Some(by.clone()),
            Some(r) if r.is_ready() => None,
            _ => Some(dep.clone()),
        })
    }
}
