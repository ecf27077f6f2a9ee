//! Error types for sf-db

use thiserror::Error;

/// Storage backend errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Backend connection failed: {0}")]
    ConnectionError(String),

    /// Execution hook failure (D002)
    #[error("[D002] Migration execution failed: {0}")]
    ExecutionError(String),

    /// Ledger read/write failure (D003)
    #[error("[D003] Migrations ledger error: {0}")]
    LedgerError(String),

    /// Up-script not found for a version (D004)
    #[error("[D004] No up script for version {version}: expected {path}")]
    MigrationScriptMissing { version: String, path: String },

    /// Up-script could not be read or rendered (D005)
    #[error("[D005] Migration script error: {0}")]
    ScriptError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
