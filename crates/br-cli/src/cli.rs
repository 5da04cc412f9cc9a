//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Bedrock - provision and verify master-data schemas
#[derive(Parser, Debug)]
#[command(name = "bedrock")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply and verify schema units in dependency order
    Deploy(DeployArgs),

    /// Verify schema units without changing anything
    Verify(VerifyArgs),

    /// Show per-unit status grouped by category
    Status(StatusArgs),

    /// Show the execution plan without touching the database
    Plan(PlanArgs),

    /// Print the statements a script splits into
    Split(SplitArgs),
}

/// Unit selection shared by several commands
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Unit names (comma-separated, default: all)
    #[arg(short, long)]
    pub units: Option<String>,

    /// Include transitive dependencies of the selected units
    #[arg(long)]
    pub with_deps: bool,
}

impl SelectionArgs {
    /// Parse the comma-separated unit list
    pub fn unit_names(&self) -> Vec<String> {
        self.units
            .as_deref()
            .map(|units| {
                units
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Arguments for the deploy command
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Unit whose script to split
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub unit: Option<String>,

    /// SQL file to split instead of a unit
    #[arg(long)]
    pub file: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
