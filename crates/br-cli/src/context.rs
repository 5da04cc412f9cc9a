//! Project context shared by CLI commands

use anyhow::{Context, Result};
use br_core::{Config, DatabaseConfig, SchemaUnit, UnitRegistry};
use br_db::{Database, DbResult};
use std::path::{Path, PathBuf};

use crate::cli::{GlobalArgs, SelectionArgs};

/// Loaded configuration, unit registry, and resolved database settings
pub(crate) struct ProjectContext {
    pub(crate) config: Config,
    pub(crate) registry: UnitRegistry,
    pub(crate) database: DatabaseConfig,
    pub(crate) target: Option<String>,
}

impl ProjectContext {
    /// Load the project described by the global arguments
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&global.project_dir);

        let config = match &global.config {
            Some(path) => {
                Config::load(Path::new(path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
        };

        let registry = config
            .build_registry(&root)
            .context("Failed to build unit registry")?;

        let target = Config::resolve_target(global.target.as_deref());
        let database = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database configuration")?;

        log::debug!(
            "Loaded project '{}' with {} unit(s), database {} at {}",
            config.name,
            registry.len(),
            database.db_type,
            database.path
        );

        Ok(Self {
            config,
            registry,
            database,
            target,
        })
    }

    /// Units chosen by `selection`, in topological order
    pub(crate) fn select(&self, selection: &SelectionArgs) -> Result<Vec<&SchemaUnit>> {
        self.registry
            .select(&selection.unit_names(), selection.with_deps)
            .context("Invalid unit selection")
    }

    /// Open a handle to the configured database
    pub(crate) fn connect(&self) -> DbResult<Box<dyn Database>> {
        br_db::connect(&self.database)
    }

    /// Human-readable label for the resolved target
    pub(crate) fn target_label(&self) -> String {
        match &self.target {
            Some(target) => format!("{} ({})", self.config.name, target),
            None => self.config.name.clone(),
        }
    }
}
