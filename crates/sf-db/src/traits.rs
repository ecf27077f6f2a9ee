//! Storage backend trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sf_core::{CustomOptions, Direction, Version};
use std::path::Path;

/// Default name of the ledger table recording applied migrations.
pub const DEFAULT_MIGRATIONS_TABLE: &str = "migrations";

/// Pluggable storage backend for Semflow.
///
/// A backend owns two responsibilities: persisting the applied-migration
/// ledger, and executing the actual per-version migration work through the
/// `up` hook. Connection parameters and the ledger table name are
/// construction-time configuration of the implementation.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Verify the backend connection is usable.
    async fn connect(&self) -> DbResult<()>;

    /// Whether the ledger table exists.
    async fn has_migrations_table(&self) -> DbResult<bool>;

    /// Create the ledger table. Idempotent; the engine only calls this
    /// after `has_migrations_table` reported false.
    async fn create_migrations_table(&self) -> DbResult<()>;

    /// Whether `(version, direction)` is already recorded in the ledger.
    async fn has_migration(&self, version: &Version, direction: Direction) -> DbResult<bool>;

    /// The highest applied `up` version under semantic-version ordering,
    /// or `None` when the ledger is empty.
    async fn get_latest_applied_migration(&self) -> DbResult<Option<Version>>;

    /// Append `(version, direction)` to the ledger. The record must be
    /// durable before this returns success.
    async fn add_migration_to_migrations_table(
        &self,
        version: &Version,
        direction: Direction,
    ) -> DbResult<()>;

    /// Execute the up migration for `version`, resolving its entry point
    /// under `migrations_directory`. `options` is an opaque bag the caller
    /// passes through; the backend decides what, if anything, it means.
    async fn up(
        &self,
        version: &Version,
        migrations_directory: &Path,
        options: &CustomOptions,
    ) -> DbResult<()>;

    /// Name of the per-version entry-point file this backend executes
    /// (e.g. "up.sql"). Consumed by the engine's capability check.
    fn up_entry_point(&self) -> &'static str;

    /// Backend type identifier for logging
    fn backend_type(&self) -> &'static str;
}
