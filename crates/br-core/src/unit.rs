//! Schema unit declarations.
//!
//! A [`SchemaUnit`] is one provisionable piece of schema: usually a table,
//! occasionally a named migration step that alters one. It carries its raw
//! definition script plus the structural baseline the verifier checks after
//! the script ran.

use crate::checksum::compute_checksum;
use crate::sql::split_statements;
use crate::unit_name::UnitName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose label shown on the status surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    /// Organisational structure (sites, departments, roles)
    Organization,
    /// External parties (customers, suppliers)
    Partner,
    /// Document management lookups (document types, languages, review cycles)
    Document,
    /// Notification channels and templates
    Notification,
    /// Anything declared without a category
    #[default]
    Other,
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitCategory::Organization => write!(f, "organization"),
            UnitCategory::Partner => write!(f, "partner"),
            UnitCategory::Document => write!(f, "document"),
            UnitCategory::Notification => write!(f, "notification"),
            UnitCategory::Other => write!(f, "other"),
        }
    }
}

/// Minimum amount of baseline data a unit must hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedRequirement {
    /// Required number of qualifying rows
    pub min_rows: usize,

    /// Optional SQL boolean expression restricting which rows qualify
    #[serde(default)]
    pub filter: Option<String>,
}

impl SeedRequirement {
    /// Require at least `min_rows` rows, all rows qualifying.
    pub fn at_least(min_rows: usize) -> Self {
        Self {
            min_rows,
            filter: None,
        }
    }

    /// Restrict qualifying rows to those matching `filter`.
    pub fn matching(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// A declared, immutable schema unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaUnit {
    name: UnitName,
    table: UnitName,
    script: String,
    columns: Vec<String>,
    seed: Option<SeedRequirement>,
    depends_on: Vec<UnitName>,
    category: UnitCategory,
    description: Option<String>,
}

impl SchemaUnit {
    /// Start declaring a unit with its definition script.
    pub fn builder(name: UnitName, script: impl Into<String>) -> SchemaUnitBuilder {
        SchemaUnitBuilder {
            unit: SchemaUnit {
                table: name.clone(),
                name,
                script: script.into(),
                columns: Vec::new(),
                seed: None,
                depends_on: Vec::new(),
                category: UnitCategory::default(),
                description: None,
            },
        }
    }

    pub fn name(&self) -> &UnitName {
        &self.name
    }

    /// Relation the verifier inspects. Same as the unit name unless the unit
    /// is a migration step altering another unit's table.
    pub fn table(&self) -> &UnitName {
        &self.table
    }

    /// Raw definition script, comments included.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Columns the live table must have, in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn seed(&self) -> Option<&SeedRequirement> {
        self.seed.as_ref()
    }

    /// Direct dependencies, in declaration order.
    pub fn depends_on(&self) -> &[UnitName] {
        &self.depends_on
    }

    pub fn category(&self) -> UnitCategory {
        self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The script split into executable statements.
    pub fn statements(&self) -> Vec<String> {
        split_statements(&self.script)
    }

    /// SHA-256 of the raw script, for spotting drift between deployments.
    pub fn checksum(&self) -> String {
        compute_checksum(&self.script)
    }
}

/// Builder for [`SchemaUnit`]; the built unit cannot be changed afterwards.
#[derive(Debug, Clone)]
pub struct SchemaUnitBuilder {
    unit: SchemaUnit,
}

impl SchemaUnitBuilder {
    /// Verify `table` instead of the relation named after the unit.
    pub fn table(mut self, table: UnitName) -> Self {
        self.unit.table = table;
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn seed(mut self, seed: SeedRequirement) -> Self {
        self.unit.seed = Some(seed);
        self
    }

    /// Add a dependency. Repeated dependencies are recorded once.
    pub fn depends_on(mut self, dependency: UnitName) -> Self {
        if !self.unit.depends_on.contains(&dependency) {
            self.unit.depends_on.push(dependency);
        }
        self
    }

    pub fn category(mut self, category: UnitCategory) -> Self {
        self.unit.category = category;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.unit.description = Some(description.into());
        self
    }

    pub fn build(self) -> SchemaUnit {
        self.unit
    }
}
