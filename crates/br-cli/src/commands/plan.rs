//! Plan command implementation

use anyhow::Result;
use br_core::UnitName;
use br_provision::plan;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common;
use crate::context::ProjectContext;

/// Execute the plan command
pub(crate) async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let units = ctx.select(&args.selection)?;
    let planned = plan(&ctx.registry, &units)?;

    match args.output {
        OutputFormat::Json => common::print_json(&planned)?,
        OutputFormat::Table => {
            let rows: Vec<Vec<String>> = planned
                .iter()
                .map(|p| {
                    vec![
                        p.step.to_string(),
                        p.unit.to_string(),
                        p.category.to_string(),
                        p.statements.to_string(),
                        p.checksum[..12].to_string(),
                        name_list(&p.depends_on),
                        name_list(&p.required_by),
                    ]
                })
                .collect();
            common::print_table(
                &[
                    "STEP",
                    "UNIT",
                    "CATEGORY",
                    "STATEMENTS",
                    "CHECKSUM",
                    "DEPENDS_ON",
                    "REQUIRED_BY",
                ],
                &rows,
            );
            println!();
            println!("{} unit(s) planned for {}", planned.len(), ctx.target_label());
        }
    }
    Ok(())
}

fn name_list(names: &[UnitName]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        let names: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        names.join(", ")
    }
}
