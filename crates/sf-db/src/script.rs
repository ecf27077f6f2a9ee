//! On-disk up-script convention
//!
//! A migration lives at `<migrations_directory>/<version>/up.sql`. Scripts
//! are Jinja templates with a single `var()` function over the run's
//! options bag. Entry-point path construction lives here and nowhere else.

use crate::error::{DbError, DbResult};
use minijinja::Environment;
use sf_core::{CustomOptions, Version};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of a version's up entry point.
pub const UP_ENTRY_POINT: &str = "up.sql";

/// Path of the up script for `version` under `migrations_directory`.
pub fn up_script_path(migrations_directory: &Path, version: &Version) -> PathBuf {
    migrations_directory
        .join(version.to_string())
        .join(UP_ENTRY_POINT)
}

/// Read the up script for `version`.
///
/// A missing file is `MigrationScriptMissing`; any other read failure is a
/// `ScriptError`.
pub fn load_up_script(migrations_directory: &Path, version: &Version) -> DbResult<String> {
    let path = up_script_path(migrations_directory, version);
    std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            DbError::MigrationScriptMissing {
                version: version.to_string(),
                path: path.display().to_string(),
            }
        } else {
            DbError::ScriptError(format!("failed to read {}: {}", path.display(), e))
        }
    })
}

/// Render a script template, exposing `var("name")` / `var("name", default)`
/// over the options bag.
pub fn render_script(source: &str, options: &CustomOptions) -> DbResult<String> {
    let mut env = Environment::new();
    let vars = options.clone();
    env.add_function(
        "var",
        move |name: &str, default: Option<minijinja::Value>| {
            if let Some(value) = vars.get(name) {
                Ok(minijinja::Value::from_serialize(value))
            } else if let Some(default_val) = default {
                Ok(default_val)
            } else {
                Err(minijinja::Error::new(
                    minijinja::ErrorKind::UndefinedError,
                    format!("Variable '{}' is not defined and no default provided", name),
                ))
            }
        },
    );

    env.render_str(source, ())
        .map_err(|e| DbError::ScriptError(e.to_string()))
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
