//! Execution plan: what a deploy would run, without touching a database.

use br_core::{CoreResult, SchemaUnit, UnitCategory, UnitName, UnitRegistry};
use serde::Serialize;

/// One planned unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedUnit {
    /// 1-based position in the run
    pub step: usize,
    pub unit: UnitName,
    pub table: UnitName,
    pub category: UnitCategory,
    pub depends_on: Vec<UnitName>,

    /// Registered units that directly depend on this one
    pub required_by: Vec<UnitName>,

    pub statements: usize,
    pub checksum: String,
}

/// Plan `units`, which must already be in topological order.
///
/// `required_by` looks at the whole registry, not just the selection.
pub fn plan(registry: &UnitRegistry, units: &[&SchemaUnit]) -> CoreResult<Vec<PlannedUnit>> {
    units
        .iter()
        .enumerate()
        .map(|(i, unit)| {
            Ok(PlannedUnit {
                step: i + 1,
                unit: unit.name().clone(),
                table: unit.table().clone(),
                category: unit.category(),
                depends_on: unit.depends_on().to_vec(),
                required_by: registry.dependents(unit.name())?,
                statements: unit.statements().len(),
                checksum: unit.checksum(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_follows_given_order() {
        let registry = UnitRegistry::build(br_core::catalog::builtin_units()).unwrap();
        let units = registry.select(&["dms_process_areas"], true).unwrap();
        let planned = plan(&registry, &units).unwrap();

        let names: Vec<&str> = planned.iter().map(|p| p.unit.as_str()).collect();
        assert_eq!(
            names,
            vec!["dms_sites", "dms_departments", "dms_process_areas"]
        );
        assert_eq!(planned[0].step, 1);
        assert_eq!(planned[2].depends_on, vec![UnitName::new("dms_departments")]);
        assert!(planned.iter().all(|p| p.statements >= 1));
        assert_eq!(planned[0].checksum.len(), 64);
    }

    #[test]
    fn test_plan_lists_dependents_outside_selection() {
        let registry = UnitRegistry::build(br_core::catalog::builtin_units()).unwrap();
        let units = registry.select(&["dms_sites"], false).unwrap();
        let planned = plan(&registry, &units).unwrap();

        assert_eq!(planned.len(), 1);
        assert!(planned[0]
            .required_by
            .contains(&UnitName::new("dms_departments")));

        let units = registry
            .select(&["dms_notification_templates"], false)
            .unwrap();
        let planned = plan(&registry, &units).unwrap();
        assert!(planned[0].required_by.is_empty());
    }

    #[test]
    fn test_plan_counts_seed_statements() {
        let registry = UnitRegistry::build(br_core::catalog::builtin_units()).unwrap();
        let units = registry.select(&["dms_roles"], false).unwrap();
        let planned = plan(&registry, &units).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].statements, 2);
    }
}
