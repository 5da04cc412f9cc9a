//! Status command implementation
//!
//! Renders the status surface: every unit grouped by category with
//! existence, missing columns, and row counts.

use anyhow::{Context, Result};
use br_core::UnitCategory;
use br_provision::{check, UnitStatus};
use std::collections::BTreeMap;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common;
use crate::context::ProjectContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let units = ctx.select(&args.selection)?;

    let db = ctx.connect().context("Failed to connect to database")?;
    let report = check(&ctx.registry, &units, db.as_ref())
        .await
        .context("Failed to read unit status")?;

    match args.output {
        OutputFormat::Json => common::print_json(&report.units)?,
        OutputFormat::Table => {
            println!("Target: {}", ctx.target_label());
            println!();
            print_grouped(&report.units);
        }
    }
    Ok(())
}

fn print_grouped(statuses: &[UnitStatus]) {
    let mut groups: BTreeMap<String, Vec<&UnitStatus>> = BTreeMap::new();
    for status in statuses {
        groups
            .entry(category_label(status.category).to_string())
            .or_default()
            .push(status);
    }

    for (label, members) in groups {
        println!("{}", label);
        let rows: Vec<Vec<String>> = members.iter().map(|s| status_row(s)).collect();
        common::print_table(&["UNIT", "TABLE", "EXISTS", "ROWS", "MIN", "MISSING"], &rows);
        println!();
    }

    let present = statuses.iter().filter(|s| s.exists).count();
    println!("{} of {} unit(s) present", present, statuses.len());
}

fn status_row(status: &UnitStatus) -> Vec<String> {
    let exists = match (&status.blocked_by, &status.error, status.exists) {
        (Some(by), _, _) => format!("blocked ({})", by),
        (None, Some(_), _) => "error".to_string(),
        (None, None, true) => "yes".to_string(),
        (None, None, false) => "no".to_string(),
    };
    let missing = if status.missing_columns.is_empty() {
        "-".to_string()
    } else {
        status.missing_columns.join(", ")
    };
    vec![
        status.unit.to_string(),
        status.table.to_string(),
        exists,
        common::or_dash(status.row_count),
        common::or_dash(status.required_minimum),
        missing,
    ]
}

fn category_label(category: UnitCategory) -> &'static str {
    match category {
        UnitCategory::Organization => "Organization",
        UnitCategory::Partner => "Partners",
        UnitCategory::Document => "Document management",
        UnitCategory::Notification => "Notifications",
        UnitCategory::Other => "Other",
    }
}
