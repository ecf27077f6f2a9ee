//! Migration orchestration
//!
//! `Migrator` owns a storage backend and its run configuration; there is no
//! process-wide state, so independently configured migrators can coexist in
//! one process.

use crate::catalog;
use crate::error::{EngineError, EngineResult};
use crate::executor::MigrationExecutor;
use crate::planner;
use sf_core::{CoreError, CustomOptions, Direction, Version};
use sf_db::StorageBackend;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Engine configuration for one migration target.
#[derive(Debug, Clone)]
pub struct MigratorConfig {
    /// Directory holding one sub-directory per migration version
    pub migrations_directory: PathBuf,

    /// Version presumed already represented by the system's initial state;
    /// `can_migrate` reports false for it unconditionally.
    pub bootstrap_version: Option<Version>,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpOutcome {
    /// The desired version was already in the ledger; nothing ran.
    AlreadyApplied,
    /// These versions were applied, in order.
    Applied(Vec<Version>),
}

/// The migration engine.
pub struct Migrator {
    backend: Arc<dyn StorageBackend>,
    config: MigratorConfig,
}

impl Migrator {
    pub fn new(config: MigratorConfig, backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend, config }
    }

    /// The backend this engine migrates through.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// The migrations directory this engine scans.
    pub fn migrations_directory(&self) -> &Path {
        &self.config.migrations_directory
    }

    /// Verify the backend connection is usable.
    pub async fn connect(&self) -> EngineResult<()> {
        self.backend.connect().await.map_err(EngineError::from)
    }

    /// Migrate up to `desired`.
    ///
    /// Repeated runs converge: a version already recorded is a no-op, and a
    /// run interrupted by a failure resumes from the first unrecorded
    /// version when rerun with the same target.
    pub async fn up(&self, desired: &Version, options: &CustomOptions) -> EngineResult<UpOutcome> {
        self.ensure_migrations_table().await?;

        if self.backend.has_migration(desired, Direction::Up).await? {
            log::debug!("v{desired} already applied, nothing to do");
            return Ok(UpOutcome::AlreadyApplied);
        }

        // Independent reads, joined before planning.
        let (available, latest_applied) = tokio::try_join!(
            catalog::list_available(&self.config.migrations_directory),
            self.latest_applied(),
        )?;
        log::debug!(
            "{} available migration(s), latest applied: {}",
            available.len(),
            latest_applied
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".to_string()),
        );

        let pending = planner::plan(desired, latest_applied.as_ref(), &available);
        let executor =
            MigrationExecutor::new(self.backend.as_ref(), &self.config.migrations_directory);

        if pending.is_empty() {
            // Nothing discoverable to run: apply the requested version
            // itself as a single migration (first-run bootstrap).
            executor.apply_one(desired, Direction::Up, options).await?;
            return Ok(UpOutcome::Applied(vec![desired.clone()]));
        }

        executor.apply_all(&pending, options).await?;
        Ok(UpOutcome::Applied(pending))
    }

    /// Whether an executable up migration for `version` exists on disk.
    ///
    /// The configured bootstrap version always reports false, regardless of
    /// what is present.
    pub async fn can_migrate(&self, version: &Version) -> EngineResult<bool> {
        if self.config.bootstrap_version.as_ref() == Some(version) {
            return Ok(false);
        }

        let version_dir = self.config.migrations_directory.join(version.to_string());
        if !Self::is_dir(&version_dir).await? {
            return Ok(false);
        }

        let entry_point = version_dir.join(self.backend.up_entry_point());
        Self::is_file(&entry_point).await
    }

    /// Compute the pending set for `desired` without applying anything.
    /// Read-only; the ledger table must already exist for a meaningful
    /// answer, but a missing table is treated as an empty ledger.
    pub async fn pending(&self, desired: &Version) -> EngineResult<Vec<Version>> {
        let available = catalog::list_available(&self.config.migrations_directory).await?;
        let latest_applied = if self.backend.has_migrations_table().await? {
            self.backend.get_latest_applied_migration().await?
        } else {
            None
        };
        Ok(planner::plan(desired, latest_applied.as_ref(), &available))
    }

    async fn ensure_migrations_table(&self) -> EngineResult<()> {
        if !self.backend.has_migrations_table().await? {
            log::debug!("Creating migrations ledger table");
            self.backend.create_migrations_table().await?;
        }
        Ok(())
    }

    async fn latest_applied(&self) -> EngineResult<Option<Version>> {
        self.backend
            .get_latest_applied_migration()
            .await
            .map_err(EngineError::from)
    }

    async fn is_dir(path: &Path) -> EngineResult<bool> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            }
            .into()),
        }
    }

    async fn is_file(path: &Path) -> EngineResult<bool> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(CoreError::IoWithPath {
                path: path.display().to_string(),
                source: e,
            }
            .into()),
        }
    }
}
