//! Migration planner
//!
//! Computes the pending set for one run: every available version strictly
//! newer than what has been applied and no newer than the target. Because
//! planning only ever proposes work not yet in the ledger, rerunning the
//! same target after a failure resumes exactly where the previous run
//! stopped.

use sf_core::version::{sort_versions, Version};

/// Compute the ordered pending set.
///
/// A candidate is included iff it is `<= desired` and, when a latest
/// applied version exists, strictly newer than it. Versions equal to
/// `latest_applied` are never replanned.
pub fn plan(
    desired: &Version,
    latest_applied: Option<&Version>,
    available: &[Version],
) -> Vec<Version> {
    let mut pending: Vec<Version> = available
        .iter()
        .filter(|candidate| *candidate <= desired)
        .filter(|candidate| latest_applied.is_none_or(|applied| *candidate > applied))
        .cloned()
        .collect();
    sort_versions(&mut pending);
    pending
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
