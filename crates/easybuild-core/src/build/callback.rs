//! Build reporting hooks.

use std::path::Path;

use crate::analyze::SourceFile;

use super::progress::Progress;

/// Callback for build progress reporting.
///
/// Compile hooks are called from worker threads. Progress notifications are
/// delivered under the orchestrator's progress lock, so `on_progress` calls
/// never interleave and their percentages never decrease.
pub trait BuildCallback: Send + Sync {
    /// Called once analysis finished, with the number of recognized sources
    /// and how many of them are stale.
    fn on_analyzed(&self, _total: usize, _to_build: usize) {}

    /// Called before the first compile job is queued.
    fn on_build_started(&self, _files: &[SourceFile]) {}

    /// Called when a compile job starts running its command.
    fn on_progress(&self, _progress: &Progress, _file: &SourceFile) {}

    /// Called when a compile command exits non-zero.
    fn on_compile_failed(&self, _file: &SourceFile, _status: i32) {}

    /// Called right before the link command runs.
    fn on_link(&self, _progress: &Progress, _command: &str, _target: &Path) {}

    /// Called for every path removed by a clean run.
    fn on_clean(&self, _path: &Path) {}
}
