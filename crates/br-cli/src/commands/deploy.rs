//! Deploy command implementation

use anyhow::Result;
use br_provision::{deploy, DeploymentOutcome, DeploymentStatus, ProvisionError, Selection};

use crate::cli::{DeployArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{self, ExitCode};
use crate::context::ProjectContext;

/// Execute the deploy command
///
/// Exit codes: 0 success, 2 partial (statement errors), 1 failed.
pub(crate) async fn execute(args: &DeployArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let selection = Selection {
        units: args.selection.unit_names(),
        with_dependencies: args.selection.with_deps,
    };

    log::info!("Deploying to {}", ctx.target_label());
    let outcome = deploy(&ctx.registry, &selection, || ctx.connect()).await;

    match args.output {
        OutputFormat::Json => common::print_json(&outcome)?,
        OutputFormat::Table => print_outcome(&outcome),
    }

    match outcome.status {
        DeploymentStatus::Success => Ok(()),
        DeploymentStatus::Partial => Err(ExitCode(2).into()),
        DeploymentStatus::Failed => Err(ExitCode(1).into()),
    }
}

fn print_outcome(outcome: &DeploymentOutcome) {
    let rows: Vec<Vec<String>> = outcome
        .units
        .iter()
        .map(|u| {
            let report = u.execution.as_ref();
            vec![
                u.unit.to_string(),
                u.state.to_string(),
                common::or_dash(report.map(|r| r.executed)),
                common::or_dash(report.map(|r| r.skipped)),
                common::or_dash(report.map(|r| r.errored)),
                common::or_dash(u.verification.as_ref()),
            ]
        })
        .collect();

    if !rows.is_empty() {
        common::print_table(
            &["UNIT", "STATE", "EXECUTED", "SKIPPED", "ERRORED", "VERIFICATION"],
            &rows,
        );
        println!();
    }

    for unit in &outcome.units {
        for failure in unit.execution.iter().flat_map(|r| &r.failures) {
            eprintln!(
                "  {} statement {}: {}\n    {}",
                unit.unit,
                failure.index + 1,
                failure.message,
                first_line(&failure.statement)
            );
        }
    }

    if let Some(error) = &outcome.error {
        eprintln!("{}", error);
        if let Some(hint) = remediation(error) {
            eprintln!("  hint: {}", hint);
        }
    }
    if !outcome.not_attempted.is_empty() {
        let names: Vec<&str> = outcome.not_attempted.iter().map(|n| n.as_str()).collect();
        eprintln!("Not attempted: {}", names.join(", "));
    }

    let totals = outcome.totals();
    println!(
        "{}: {} unit(s), {} statement(s): {} executed, {} skipped, {} errored in {:.2}s",
        outcome.status,
        outcome.units.len(),
        totals.total(),
        totals.executed,
        totals.skipped,
        totals.errored,
        outcome.duration_secs()
    );
}

/// What the operator should do next for each halting error.
fn remediation(error: &ProvisionError) -> Option<&'static str> {
    match error {
        ProvisionError::DependencyUnmet { .. } => {
            Some("nothing was applied; deploy the dependency first or pass --with-deps")
        }
        ProvisionError::VerificationMismatch { .. } => {
            Some("statements ran but the result is incomplete; check the unit's script")
        }
        ProvisionError::Connection { .. } => Some("check the database path for this target"),
        ProvisionError::Configuration { .. } | ProvisionError::Database { .. } => None,
    }
}

fn first_line(statement: &str) -> &str {
    statement.lines().next().unwrap_or(statement)
}
