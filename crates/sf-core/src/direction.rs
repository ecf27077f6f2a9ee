//! Migration direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a migration.
///
/// Only `Up` is executable today. `Down` exists so ledger records carry a
/// direction from day one; asking the engine to execute it is rejected with
/// `UnsupportedDirection` rather than guessed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply a migration
    Up,
    /// Revert a migration (reserved, never executed)
    Down,
}

impl Direction {
    /// Ledger representation of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
