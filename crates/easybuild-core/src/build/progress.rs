//! Percentage-complete bookkeeping.

use std::fmt;

/// Position of one step within a build phase.
///
/// `total` counts every compile step plus the pending link step, so the last
/// compile of a linking build stays below 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    /// Completion in whole percent, truncated.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.current.min(self.total) * 100 / self.total
    }

    /// Render a progress line: `[ NNN% ] <description>`.
    pub fn line(&self, description: &str) -> String {
        format!("{} {}", self, description)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {:>3}% ]", self.percent())
    }
}

/// Monotonic step counter shared by the jobs of one phase.
#[derive(Debug)]
pub(crate) struct ProgressCounter {
    completed: usize,
    total: usize,
}

impl ProgressCounter {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            completed: 0,
            total,
        }
    }

    /// Count one more step and return the resulting position.
    pub(crate) fn advance(&mut self) -> Progress {
        self.completed += 1;
        Progress::new(self.completed, self.total)
    }
}
