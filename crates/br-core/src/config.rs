//! Configuration types and parsing for bedrock.yml

use crate::catalog;
use crate::error::{CoreError, CoreResult};
use crate::registry::UnitRegistry;
use crate::unit::{SchemaUnit, SeedRequirement, UnitCategory};
use crate::unit_name::UnitName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable consulted when no `--target` flag is given.
pub const TARGET_ENV_VAR: &str = "BEDROCK_TARGET";

const CONFIG_FILE_NAMES: [&str; 2] = ["bedrock.yml", "bedrock.yaml"];

/// Project configuration from bedrock.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,

    /// Include the built-in master-data catalog
    #[serde(default = "default_true")]
    pub builtin_catalog: bool,

    /// Additional project-specific units, appended after the catalog
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// A project-declared schema unit as written in bedrock.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitConfig {
    pub name: UnitName,

    /// Relation to verify when it differs from `name` (migration steps)
    #[serde(default)]
    pub table: Option<UnitName>,

    /// Inline definition script
    #[serde(default)]
    pub script: Option<String>,

    /// Definition script file, relative to the project directory
    #[serde(default)]
    pub script_file: Option<String>,

    /// Columns the provisioned table must expose
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub depends_on: Vec<UnitName>,

    #[serde(default)]
    pub seed: Option<SeedRequirement>,

    #[serde(default)]
    pub category: UnitCategory,

    #[serde(default)]
    pub description: Option<String>,
}

impl UnitConfig {
    /// Resolve the script source and produce the immutable unit.
    pub fn to_unit(&self, root: &Path) -> CoreResult<SchemaUnit> {
        let script = match (&self.script, &self.script_file) {
            (Some(inline), None) => inline.clone(),
            (None, Some(file)) => {
                let path = root.join(file);
                std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                    path: path.display().to_string(),
                    source: e,
                })?
            }
            _ => {
                return Err(CoreError::ScriptSource {
                    name: self.name.to_string(),
                })
            }
        };

        let mut builder = SchemaUnit::builder(self.name.clone(), script)
            .columns(self.columns.iter().cloned())
            .category(self.category);
        for dep in &self.depends_on {
            builder = builder.depends_on(dep.clone());
        }
        if let Some(table) = &self.table {
            builder = builder.table(table.clone());
        }
        if let Some(seed) = &self.seed {
            builder = builder.seed(seed.clone());
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }
        Ok(builder.build())
    }
}

fn default_true() -> bool {
    true
}

const DEFAULT_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for bedrock.yml or bedrock.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        for unit in &self.units {
            if unit.script.is_some() == unit.script_file.is_some() {
                return Err(CoreError::ScriptSource {
                    name: unit.name.to_string(),
                });
            }
            if let Some(seed) = &unit.seed {
                if seed.filter.as_deref().is_some_and(|f| f.trim().is_empty()) {
                    return Err(CoreError::ConfigInvalid {
                        message: format!("Unit '{}' has an empty seed filter", unit.name),
                    });
                }
            }
        }

        if !self.builtin_catalog && self.units.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "No units declared and builtin_catalog is disabled".to_string(),
            });
        }

        Ok(())
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Sorted target names
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve target from CLI flag or BEDROCK_TARGET environment variable
    ///
    /// Priority: CLI flag > BEDROCK_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
    }

    /// Build the unit registry: built-in catalog (if enabled) followed by the
    /// project's own units. Script files resolve relative to `root`.
    pub fn build_registry(&self, root: &Path) -> CoreResult<UnitRegistry> {
        let mut units = if self.builtin_catalog {
            catalog::builtin_units()
        } else {
            Vec::new()
        };
        for unit in &self.units {
            units.push(unit.to_unit(root)?);
        }
        UnitRegistry::build(units)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
