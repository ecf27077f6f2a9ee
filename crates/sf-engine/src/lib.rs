//! sf-engine - Migration resolution and application engine for Semflow
//!
//! Discovers available migrations on disk, diffs them against the applied
//! ledger held by a storage backend, and applies the pending set in
//! ascending semantic-version order, fail-fast, recording each step in the
//! ledger as it completes.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod migrator;
pub mod planner;

pub use error::{EngineError, EngineResult};
pub use executor::MigrationExecutor;
pub use migrator::{Migrator, MigratorConfig, UpOutcome};
