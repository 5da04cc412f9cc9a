//! Built-in master-data catalog.
//!
//! Each unit's script is a `.sql` file embedded via `include_str!`. The
//! [`CATALOG`] array is in declaration order; dependency order is resolved
//! by the registry, not by position here.

use crate::unit::{SchemaUnit, SeedRequirement, UnitCategory};
use crate::unit_name::UnitName;

/// Static declaration of one catalog unit.
struct CatalogEntry {
    name: &'static str,
    /// Relation to verify when it is not `name`
    table: Option<&'static str>,
    sql: &'static str,
    columns: &'static [&'static str],
    depends_on: &'static [&'static str],
    /// Minimum rows and optional qualifying filter
    seed: Option<(usize, Option<&'static str>)>,
    category: UnitCategory,
    description: &'static str,
}

static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "dms_sites",
        table: None,
        sql: include_str!("dms_sites.sql"),
        columns: &["id", "site_code", "site_name", "country_code", "is_active"],
        depends_on: &[],
        seed: None,
        category: UnitCategory::Organization,
        description: "Manufacturing sites",
    },
    CatalogEntry {
        name: "dms_departments",
        table: None,
        sql: include_str!("dms_departments.sql"),
        columns: &["id", "site_id", "department_code", "department_name"],
        depends_on: &["dms_sites"],
        seed: None,
        category: UnitCategory::Organization,
        description: "Departments per site",
    },
    CatalogEntry {
        name: "dms_roles",
        table: None,
        sql: include_str!("dms_roles.sql"),
        columns: &["id", "role_name", "display_name", "is_active"],
        depends_on: &[],
        seed: Some((4, None)),
        category: UnitCategory::Organization,
        description: "Workflow roles",
    },
    CatalogEntry {
        name: "dms_customers",
        table: None,
        sql: include_str!("dms_customers.sql"),
        columns: &["id", "customer_number", "name", "country_code", "is_active"],
        depends_on: &[],
        seed: None,
        category: UnitCategory::Partner,
        description: "Customers",
    },
    CatalogEntry {
        name: "dms_customers_vat_id",
        table: Some("dms_customers"),
        sql: include_str!("dms_customers_vat_id.sql"),
        columns: &["vat_id"],
        depends_on: &["dms_customers"],
        seed: None,
        category: UnitCategory::Partner,
        description: "Customer VAT id column",
    },
    CatalogEntry {
        name: "dms_suppliers",
        table: None,
        sql: include_str!("dms_suppliers.sql"),
        columns: &["id", "supplier_number", "name", "country_code", "is_approved"],
        depends_on: &[],
        seed: None,
        category: UnitCategory::Partner,
        description: "Suppliers",
    },
    CatalogEntry {
        name: "dms_process_areas",
        table: None,
        sql: include_str!("dms_process_areas.sql"),
        columns: &["id", "department_id", "area_code", "area_name"],
        depends_on: &["dms_departments"],
        seed: None,
        category: UnitCategory::Organization,
        description: "Process areas per department",
    },
    CatalogEntry {
        name: "dms_languages",
        table: None,
        sql: include_str!("dms_languages.sql"),
        columns: &["code", "name", "is_default"],
        depends_on: &[],
        seed: Some((2, None)),
        category: UnitCategory::Document,
        description: "Document languages",
    },
    CatalogEntry {
        name: "dms_document_types",
        table: None,
        sql: include_str!("dms_document_types.sql"),
        columns: &["id", "type_code", "type_name", "process_area_id", "requires_review"],
        depends_on: &["dms_process_areas"],
        seed: Some((4, Some("process_area_id IS NULL"))),
        category: UnitCategory::Document,
        description: "Document types",
    },
    CatalogEntry {
        name: "dms_review_cycles",
        table: None,
        sql: include_str!("dms_review_cycles.sql"),
        columns: &["id", "cycle_code", "cycle_name", "interval_months"],
        depends_on: &[],
        seed: Some((3, None)),
        category: UnitCategory::Document,
        description: "Periodic review cycles",
    },
    CatalogEntry {
        name: "dms_notification_channels",
        table: None,
        sql: include_str!("dms_notification_channels.sql"),
        columns: &["id", "channel_code", "channel_name", "is_enabled"],
        depends_on: &[],
        seed: Some((2, Some("is_enabled"))),
        category: UnitCategory::Notification,
        description: "Notification channels",
    },
    CatalogEntry {
        name: "dms_notification_templates",
        table: None,
        sql: include_str!("dms_notification_templates.sql"),
        columns: &[
            "id",
            "channel_id",
            "language_code",
            "event_code",
            "subject",
            "body",
        ],
        depends_on: &["dms_notification_channels", "dms_languages"],
        seed: Some((2, Some("event_code = 'REVIEW_DUE'"))),
        category: UnitCategory::Notification,
        description: "Notification templates per channel and language",
    },
];

impl CatalogEntry {
    fn to_unit(&self) -> SchemaUnit {
        let mut builder = SchemaUnit::builder(UnitName::new(self.name), self.sql)
            .columns(self.columns.iter().copied())
            .category(self.category)
            .description(self.description);
        if let Some(table) = self.table {
            builder = builder.table(UnitName::new(table));
        }
        for dep in self.depends_on {
            builder = builder.depends_on(UnitName::new(*dep));
        }
        if let Some((min_rows, filter)) = self.seed {
            let mut seed = SeedRequirement::at_least(min_rows);
            if let Some(filter) = filter {
                seed = seed.matching(filter);
            }
            builder = builder.seed(seed);
        }
        builder.build()
    }
}

/// The built-in units, in declaration order.
pub fn builtin_units() -> Vec<SchemaUnit> {
    CATALOG.iter().map(CatalogEntry::to_unit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UnitRegistry;

    #[test]
    fn test_catalog_builds_valid_registry() {
        let registry = UnitRegistry::build(builtin_units()).unwrap();
        assert_eq!(registry.len(), CATALOG.len());
    }

    #[test]
    fn test_catalog_dependency_order() {
        let registry = UnitRegistry::build(builtin_units()).unwrap();
        let order = registry.topological_order();
        let pos = |name: &str| order.iter().position(|n| n == name).unwrap();
        assert!(pos("dms_sites") < pos("dms_departments"));
        assert!(pos("dms_departments") < pos("dms_process_areas"));
        assert!(pos("dms_process_areas") < pos("dms_document_types"));
        assert!(pos("dms_customers") < pos("dms_customers_vat_id"));
        assert!(pos("dms_notification_channels") < pos("dms_notification_templates"));
        assert!(pos("dms_languages") < pos("dms_notification_templates"));
    }

    #[test]
    fn test_catalog_scripts_split_cleanly() {
        for unit in builtin_units() {
            let statements = unit.statements();
            assert!(!statements.is_empty(), "{} has no statements", unit.name());
            for stmt in &statements {
                assert!(!stmt.starts_with("--"), "{}: comment leaked", unit.name());
                assert!(!stmt.starts_with("/*"), "{}: comment leaked", unit.name());
            }
        }
    }

    #[test]
    fn test_seeded_units_have_insert_statements() {
        for unit in builtin_units().iter().filter(|u| u.seed().is_some()) {
            assert_eq!(unit.statements().len(), 2, "{}", unit.name());
            assert!(unit.statements()[1].starts_with("INSERT INTO"));
        }
    }

    #[test]
    fn test_template_bodies_keep_literal_terminators() {
        let units = builtin_units();
        let templates = units
            .iter()
            .find(|u| u.name() == "dms_notification_templates")
            .unwrap();
        let statements = templates.statements();
        assert_eq!(statements.len(), 2);
        assert!(statements[1].contains("-- it is now effective"));
        assert!(statements[1].contains("fällig; bitte"));
    }

    #[test]
    fn test_migration_step_verifies_base_table() {
        let units = builtin_units();
        let step = units
            .iter()
            .find(|u| u.name() == "dms_customers_vat_id")
            .unwrap();
        assert_eq!(step.table(), "dms_customers");
        assert_eq!(step.columns(), ["vat_id"]);
    }
}
