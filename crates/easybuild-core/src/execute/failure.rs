//! Shared failure flag for cooperative abort.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle for cooperative abort of a build phase.
///
/// `FailureFlag` can be cloned and shared across jobs; any clone can raise it
/// and every other clone observes it. Raising the flag never interrupts work
/// already in flight. Jobs check it before starting and skip if it is set.
///
/// # Example
///
/// ```
/// use easybuild_core::execute::FailureFlag;
///
/// let flag = FailureFlag::new();
/// let job_flag = flag.clone();
///
/// assert!(!flag.is_raised());
///
/// // First failure wins
/// assert!(job_flag.raise());
/// assert!(!job_flag.raise());
///
/// assert!(flag.is_raised());
/// ```
#[derive(Clone, Default)]
pub struct FailureFlag {
    raised: Arc<AtomicBool>,
}

impl FailureFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a failure has been recorded.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Record a failure.
    ///
    /// Returns `true` for the call that first raised the flag.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::AcqRel)
    }
}
