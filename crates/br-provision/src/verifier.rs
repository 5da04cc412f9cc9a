//! Structural verifier
//!
//! Read-only inspection of a unit's table: does it exist, does it carry
//! the declared columns, and does it hold the required baseline rows.

use br_core::{SchemaUnit, UnitName};
use br_db::{Database, DbResult};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Observed state of one unit's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// Unit that was verified
    pub unit: UnitName,

    /// Table the unit targets
    pub table: UnitName,

    /// Whether the table exists
    pub exists: bool,

    /// Declared columns absent from the table, in declaration order
    pub missing_columns: Vec<String>,

    /// Rows counted (qualifying rows when the seed has a filter); `None` if the
    /// table is absent or the filter references a missing column
    pub row_count: Option<usize>,

    /// Baseline row minimum, when the unit declares seed data
    pub required_minimum: Option<usize>,
}

impl VerificationResult {
    /// Structure is in place: the table exists with every declared column.
    ///
    /// This is what dependents of the unit require.
    pub fn is_structurally_sound(&self) -> bool {
        self.exists && self.missing_columns.is_empty()
    }

    /// Baseline data requirement is met (trivially, when none is declared).
    pub fn seed_satisfied(&self) -> bool {
        match self.required_minimum {
            Some(min) => self.row_count.unwrap_or(0) >= min,
            None => true,
        }
    }

    /// Rows still missing from the baseline, if any.
    pub fn row_shortfall(&self) -> Option<usize> {
        let min = self.required_minimum?;
        let have = self.row_count.unwrap_or(0);
        (have < min).then(|| min - have)
    }

    pub fn passed(&self) -> bool {
        self.is_structurally_sound() && self.seed_satisfied()
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.exists {
            return write!(f, "table '{}' does not exist", self.table);
        }

        let mut problems = Vec::new();
        if !self.missing_columns.is_empty() {
            problems.push(format!(
                "missing columns: {}",
                self.missing_columns.join(", ")
            ));
        }
        if let (Some(min), Some(have)) = (self.required_minimum, self.row_count) {
            if have < min {
                problems.push(format!("{} of {} required rows present", have, min));
            }
        }

        if problems.is_empty() {
            write!(f, "ok")
        } else {
            write!(f, "{}", problems.join("; "))
        }
    }
}

/// Verify `unit` against the live database.
///
/// Issues only read-only queries. An absent table short-circuits with
/// `exists = false` and no column or row data. When declared columns are
/// missing, a seed filter is not evaluated and `row_count` stays `None`.
pub async fn verify(unit: &SchemaUnit, db: &dyn Database) -> DbResult<VerificationResult> {
    let table = unit.table();
    let required_minimum = unit.seed().map(|s| s.min_rows);

    if !db.relation_exists(table).await? {
        log::debug!("verify {}: table {} absent", unit.name(), table);
        return Ok(VerificationResult {
            unit: unit.name().clone(),
            table: table.clone(),
            exists: false,
            missing_columns: Vec::new(),
            row_count: None,
            required_minimum,
        });
    }

    let actual: HashSet<String> = db
        .table_columns(table)
        .await?
        .into_iter()
        .map(|c| c.to_lowercase())
        .collect();
    let missing_columns: Vec<String> = unit
        .columns()
        .iter()
        .filter(|c| !actual.contains(&c.to_lowercase()))
        .cloned()
        .collect();

    // A filter over a missing column cannot be evaluated; the structural
    // mismatch is reported instead.
    let filter = unit.seed().and_then(|s| s.filter.as_deref());
    let row_count = match filter {
        Some(_) if !missing_columns.is_empty() => None,
        _ => Some(db.count_rows(table, filter).await?),
    };

    let result = VerificationResult {
        unit: unit.name().clone(),
        table: table.clone(),
        exists: true,
        missing_columns,
        row_count,
        required_minimum,
    };
    log::debug!("verify {}: {}", unit.name(), result);
    Ok(result)
}

#[cfg(test)]
#[path = "verifier_test.rs"]
mod tests;
