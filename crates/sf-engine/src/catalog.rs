//! Migration catalog
//!
//! The migrations directory is the source of truth: one sub-directory per
//! version, rescanned on every run, never cached.

use crate::error::{EngineError, EngineResult};
use sf_core::version::{parse_version, sort_versions, Version};
use sf_core::CoreError;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

fn io_with_path(path: &Path, source: std::io::Error) -> EngineError {
    CoreError::IoWithPath {
        path: path.display().to_string(),
        source,
    }
    .into()
}

/// List the available migration versions under `migrations_directory`,
/// ascending.
///
/// Immediate entries that are not directories are silently excluded, as are
/// entries that vanish between listing and the metadata check. Every
/// remaining entry name must parse as a semantic version.
pub async fn list_available(migrations_directory: &Path) -> EngineResult<Vec<Version>> {
    let mut entries = fs::read_dir(migrations_directory)
        .await
        .map_err(|e| io_with_path(migrations_directory, e))?;

    let mut versions = Vec::new();
    loop {
        let entry = match entries
            .next_entry()
            .await
            .map_err(|e| io_with_path(migrations_directory, e))?
        {
            Some(entry) => entry,
            None => break,
        };

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            // Entry vanished between listing and the metadata check
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(io_with_path(&entry.path(), e)),
        };
        if !metadata.is_dir() {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_str().ok_or_else(|| CoreError::MalformedVersion {
            input: name.to_string_lossy().into_owned(),
            message: "directory name is not valid UTF-8".to_string(),
        })?;
        versions.push(parse_version(name)?);
    }

    sort_versions(&mut versions);
    Ok(versions)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
