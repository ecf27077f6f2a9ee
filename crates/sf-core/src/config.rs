//! Configuration types and parsing for semflow.yml

use crate::error::{CoreError, CoreResult};
use crate::options::{yaml_to_json, CustomOptions};
use crate::version::{parse_version, Version};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the bootstrap version.
///
/// The bootstrap version is presumed already represented by the system's
/// initial state; `can_migrate` reports `false` for it regardless of what
/// is on disk.
pub const BOOTSTRAP_VERSION_ENV: &str = "SEMFLOW_BOOTSTRAP_VERSION";

/// Main project configuration from semflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory containing one sub-directory per migration version
    #[serde(default = "default_migrations_path")]
    pub migrations_path: String,

    /// Name of the ledger table recording applied migrations
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Storage backend connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Default options passed to every migration's execution hook.
    /// CLI `--var` flags override entries with the same key.
    #[serde(default)]
    pub vars: HashMap<String, serde_yaml::Value>,
}

/// Backend type selector
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

/// Storage backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Backend type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
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

fn default_migrations_path() -> String {
    "migrations".to_string()
}

fn default_table_name() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    "./semflow.duckdb".to_string()
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for semflow.yml or semflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("semflow.yml");
        let yaml_path = dir.join("semflow.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: dir.join("semflow.yml").display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.table_name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Ledger table name cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Migrations directory resolved against the project root
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        let path = Path::new(&self.migrations_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    /// Configured vars converted into the options bag handed to the
    /// execution hook.
    pub fn custom_options(&self) -> CustomOptions {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), yaml_to_json(v)))
            .collect()
    }

    /// Bootstrap version from the process environment, if configured.
    ///
    /// A set-but-malformed value is an error rather than a silently ignored
    /// suppression.
    pub fn bootstrap_version_from_env() -> CoreResult<Option<Version>> {
        match std::env::var(BOOTSTRAP_VERSION_ENV) {
            Ok(raw) if !raw.is_empty() => parse_version(&raw).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
