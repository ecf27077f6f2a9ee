//! Error types for sf-engine

use sf_core::{CoreError, Direction};
use sf_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Version parsing, directory access, or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage backend ledger or execution-hook failure
    #[error(transparent)]
    Backend(#[from] DbError),

    /// M001: Direction other than "up" requested (reserved pathway)
    #[error("[M001] Unsupported migration direction '{direction}'")]
    UnsupportedDirection { direction: Direction },
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
