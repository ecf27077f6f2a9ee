//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sf_core::version::{parse_version, Version};
use sf_core::{Config, CustomOptions};
use sf_db::DuckDbBackend;
use sf_engine::{Migrator, MigratorConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// A loaded project: its configuration and resolved root directory.
pub(crate) struct ProjectContext {
    pub(crate) config: Config,
    pub(crate) root: PathBuf,
}

pub(crate) fn load_project(global: &GlobalArgs) -> Result<ProjectContext> {
    let root = PathBuf::from(&global.project_dir);
    let config = Config::load_from_dir(&root)
        .with_context(|| format!("Failed to load semflow.yml from {}", root.display()))?;
    Ok(ProjectContext { config, root })
}

/// Build the engine for a project: open the configured backend and wire it
/// to the migrations directory.
pub(crate) fn build_migrator(ctx: &ProjectContext, global: &GlobalArgs) -> Result<Migrator> {
    let backend = open_backend(ctx)?;

    let bootstrap_version = match &global.bootstrap_version {
        Some(raw) => Some(parse_version(raw).context("Invalid bootstrap version")?),
        None => None,
    };

    Ok(Migrator::new(
        MigratorConfig {
            migrations_directory: ctx.config.migrations_path_absolute(&ctx.root),
            bootstrap_version,
        },
        Arc::new(backend),
    ))
}

fn open_backend(ctx: &ProjectContext) -> Result<DuckDbBackend> {
    let raw = &ctx.config.database.path;
    let backend = if raw == ":memory:" {
        DuckDbBackend::in_memory()
    } else {
        let path = Path::new(raw);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            ctx.root.join(path)
        };
        DuckDbBackend::from_path(&path)
    };
    Ok(backend
        .context("Failed to open database")?
        .with_table(&ctx.config.table_name))
}

/// Merge config vars with CLI `--var` overrides into the options bag.
pub(crate) fn build_options(config: &Config, cli_vars: &[String]) -> Result<CustomOptions> {
    let mut options = config.custom_options();
    for raw in cli_vars {
        let (key, value) = parse_var(raw)?;
        options.insert(key, value);
    }
    Ok(options)
}

/// Parse a `key=value` CLI var. Values that parse as JSON become typed;
/// anything else stays a string.
fn parse_var(raw: &str) -> Result<(String, serde_json::Value)> {
    let (key, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid --var '{raw}': expected KEY=VALUE"))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub(crate) fn parse_target_version(raw: &str) -> Result<Version> {
    parse_version(raw).map_err(anyhow::Error::from)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
