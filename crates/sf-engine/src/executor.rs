//! Migration executor
//!
//! Applies a pending set one version at a time through the backend's
//! execution hook. Each step's ledger record is committed before the next
//! step begins, so a crash mid-run leaves the ledger reflecting exactly the
//! steps that completed. First failure aborts; nothing is retried or rolled
//! back.

use crate::error::{EngineError, EngineResult};
use sf_core::{CustomOptions, Direction, Version};
use sf_db::StorageBackend;
use std::path::Path;

/// Sequential, fail-fast executor over one run's pending set.
pub struct MigrationExecutor<'a> {
    backend: &'a dyn StorageBackend,
    migrations_directory: &'a Path,
}

impl<'a> MigrationExecutor<'a> {
    pub fn new(backend: &'a dyn StorageBackend, migrations_directory: &'a Path) -> Self {
        Self {
            backend,
            migrations_directory,
        }
    }

    /// Apply every pending version in order, stopping at the first failure.
    pub async fn apply_all(
        &self,
        pending: &[Version],
        options: &CustomOptions,
    ) -> EngineResult<()> {
        for version in pending {
            self.apply_one(version, Direction::Up, options).await?;
        }
        Ok(())
    }

    /// Apply a single migration: execution hook, then ledger record, as one
    /// unit from the caller's perspective.
    pub async fn apply_one(
        &self,
        version: &Version,
        direction: Direction,
        options: &CustomOptions,
    ) -> EngineResult<()> {
        match direction {
            Direction::Up => {
                self.backend
                    .up(version, self.migrations_directory, options)
                    .await?;
            }
            other => return Err(EngineError::UnsupportedDirection { direction: other }),
        }

        self.backend
            .add_migration_to_migrations_table(version, direction)
            .await?;
        log::info!("Applied migration v{version} ({direction})");
        Ok(())
    }
}
