//! Allow/deny decision for a single placement.

use crate::config::FrameLimit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

/// Decide whether one more qualifying entity may be placed.
///
/// `current_count` excludes the entity being placed, so a limit of `N` lets a
/// chunk reach exactly `N` entities.
pub fn evaluate(limit: FrameLimit, current_count: usize) -> Decision {
    match limit.max_count() {
        None => Decision::Allow,
        Some(max) if current_count < max => Decision::Allow,
        Some(_) => Decision::Deny,
    }
}

/// Like [`evaluate`], but only computes the count when a limit is set.
pub fn evaluate_with<F>(limit: FrameLimit, count: F) -> Decision
where
    F: FnOnce() -> usize,
{
    if limit.is_unlimited() {
        return Decision::Allow;
    }
    evaluate(limit, count())
}
