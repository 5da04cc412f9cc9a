//! Verify command implementation

use anyhow::{Context, Result};
use br_provision::{check, HealthReport, UnitStatus};

use crate::cli::{GlobalArgs, OutputFormat, VerifyArgs};
use crate::commands::common::{self, ExitCode};
use crate::context::ProjectContext;

/// Execute the verify command
///
/// Read-only. Exits 1 when any selected unit is unhealthy.
pub(crate) async fn execute(args: &VerifyArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let units = ctx.select(&args.selection)?;

    let db = ctx.connect().context("Failed to connect to database")?;
    let report = check(&ctx.registry, &units, db.as_ref())
        .await
        .context("Verification failed")?;

    match args.output {
        OutputFormat::Json => common::print_json(&report)?,
        OutputFormat::Table => print_report(&report),
    }

    if report.is_healthy() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

fn print_report(report: &HealthReport) {
    let rows: Vec<Vec<String>> = report
        .units
        .iter()
        .map(|s| {
            vec![
                s.unit.to_string(),
                if s.healthy { "ok" } else { "FAIL" }.to_string(),
                detail(s),
            ]
        })
        .collect();
    common::print_table(&["UNIT", "RESULT", "DETAIL"], &rows);

    let failing = report.unhealthy().count();
    println!();
    if failing == 0 {
        println!("All {} unit(s) verified", report.units.len());
    } else {
        println!("{} of {} unit(s) failed verification", failing, report.units.len());
    }
}

fn detail(status: &UnitStatus) -> String {
    if let Some(blocked_by) = &status.blocked_by {
        return format!("blocked by {}", blocked_by);
    }
    if let Some(error) = &status.error {
        return format!("query failed: {}", error);
    }
    if !status.exists {
        return format!("table {} missing", status.table);
    }

    let mut parts = Vec::new();
    if !status.missing_columns.is_empty() {
        parts.push(format!("missing columns: {}", status.missing_columns.join(", ")));
    }
    if let (Some(min), Some(have)) = (status.required_minimum, status.row_count) {
        if have < min {
            parts.push(format!("{} of {} seed rows", have, min));
        }
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("; ")
    }
}
