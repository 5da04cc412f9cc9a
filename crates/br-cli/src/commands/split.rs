//! Split command implementation

use anyhow::{bail, Context, Result};
use br_core::split_statements;
use serde::Serialize;
use std::path::Path;

use crate::cli::{GlobalArgs, OutputFormat, SplitArgs};
use crate::commands::common;
use crate::context::ProjectContext;

#[derive(Debug, Serialize)]
struct SplitOutput {
    source: String,
    statements: Vec<String>,
}

/// Execute the split command
pub(crate) async fn execute(args: &SplitArgs, global: &GlobalArgs) -> Result<()> {
    let output = match (&args.unit, &args.file) {
        (_, Some(file)) => {
            let script = std::fs::read_to_string(Path::new(file))
                .with_context(|| format!("Failed to read {}", file))?;
            SplitOutput {
                source: file.clone(),
                statements: split_statements(&script),
            }
        }
        (Some(name), None) => {
            let ctx = ProjectContext::load(global)?;
            let Some(unit) = ctx.registry.get(name) else {
                bail!("Unknown unit '{}'", name);
            };
            SplitOutput {
                source: unit.name().to_string(),
                statements: unit.statements(),
            }
        }
        (None, None) => bail!("Either --unit or --file is required"),
    };

    match args.output {
        OutputFormat::Json => common::print_json(&output)?,
        OutputFormat::Table => {
            for (i, statement) in output.statements.iter().enumerate() {
                println!("-- [{}/{}] {}", i + 1, output.statements.len(), output.source);
                println!("{};", statement);
                println!();
            }
        }
    }
    Ok(())
}
