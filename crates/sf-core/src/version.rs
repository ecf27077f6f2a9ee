//! Semantic version parsing and ordering
//!
//! Versions are compared as structured tokens, never as strings, so that
//! `0.10.0` orders after `0.9.0`. Every place Semflow sorts or compares
//! migration versions goes through this module.

use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;

pub use semver::Version;

/// Parse a version identifier, failing on anything that is not a valid
/// semantic version.
pub fn parse_version(input: &str) -> CoreResult<Version> {
    Version::parse(input).map_err(|e| CoreError::MalformedVersion {
        input: input.to_string(),
        message: e.to_string(),
    })
}

/// Compare two versions under semantic-version precedence.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

/// Sort a list of versions ascending, in place.
pub fn sort_versions(versions: &mut [Version]) {
    versions.sort();
}

/// Return the highest version in the slice, or `None` when it is empty.
pub fn latest(versions: &[Version]) -> Option<&Version> {
    versions.iter().max()
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
