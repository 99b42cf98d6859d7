//! Terminal progress reporting.

use std::path::Path;

use easybuild_core::{BuildCallback, Progress, SourceFile};

use crate::colors;

/// Callback that prints build progress to stdout.
pub struct TerminalProgress {
    /// Print full commands instead of `source => object`.
    verbose: bool,
}

impl TerminalProgress {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl BuildCallback for TerminalProgress {
    fn on_build_started(&self, files: &[SourceFile]) {
        if self.verbose {
            println!("{}* Build:{}", colors::BOLD, colors::RESET);
            for file in files {
                println!("    {}", file.source.display());
            }
        } else {
            println!(
                "{}* Build:{} {} files",
                colors::BOLD,
                colors::RESET,
                files.len()
            );
        }
    }

    fn on_progress(&self, progress: &Progress, file: &SourceFile) {
        let description = if self.verbose {
            file.command.clone()
        } else {
            file.describe()
        };
        println!("{}{}{} {}", colors::GREEN, progress, colors::RESET, description);
    }

    fn on_compile_failed(&self, file: &SourceFile, status: i32) {
        eprintln!(
            "{}  ✗ {}{} (exit status {})",
            colors::RED,
            file.source.display(),
            colors::RESET,
            status
        );
    }

    fn on_link(&self, progress: &Progress, command: &str, target: &Path) {
        let description = if self.verbose {
            command.to_string()
        } else {
            target.display().to_string()
        };
        println!(
            "{}{}{} {}{}{}",
            colors::GREEN,
            progress,
            colors::RESET,
            colors::CYAN,
            description,
            colors::RESET
        );
    }

    fn on_clean(&self, path: &Path) {
        if self.verbose {
            println!("{}  removed {}{}", colors::DIM, path.display(), colors::RESET);
        }
    }
}
