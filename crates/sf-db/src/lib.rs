//! sf-db - Storage backend abstraction for Semflow
//!
//! This crate provides the `StorageBackend` trait the engine migrates
//! through, the on-disk up-script convention, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod script;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use script::UP_ENTRY_POINT;
pub use traits::{StorageBackend, DEFAULT_MIGRATIONS_TABLE};
