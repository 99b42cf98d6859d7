//! Access to the outside world: processes and file metadata.
//!
//! The analyzer and the orchestrator never spawn processes or stat files
//! directly; they go through a [`Host`]. [`ShellHost`] is the real
//! implementation, tests substitute recording fakes.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use crate::error::Result;

/// External collaborators of the build engine.
pub trait Host: Send + Sync {
    /// Run a command and capture its standard output.
    ///
    /// Returns an empty string if the process cannot be spawned.
    fn run_command(&self, command: &str) -> String;

    /// Run a command to completion and return its exit status.
    ///
    /// Zero means success. A process that cannot be spawned, or that is
    /// terminated by a signal, reports `-1`.
    fn execute(&self, command: &str) -> i32;

    /// Whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Modification time of a path, if it can be read.
    fn mod_time(&self, path: &Path) -> Option<SystemTime>;

    /// Remove a file; a file that is already gone is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// [`Host`] backed by the platform shell and the real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellHost;

impl ShellHost {
    pub fn new() -> Self {
        Self
    }

    fn shell(command: &str) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl Host for ShellHost {
    fn run_command(&self, command: &str) -> String {
        match Self::shell(command).stderr(Stdio::inherit()).output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).into_owned(),
            Err(e) => {
                tracing::warn!("Failed to run '{}': {}", command, e);
                String::new()
            }
        }
    }

    fn execute(&self, command: &str) -> i32 {
        match Self::shell(command).status() {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                tracing::warn!("Failed to spawn '{}': {}", command, e);
                -1
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn mod_time(&self, path: &Path) -> Option<SystemTime> {
        match path.metadata().and_then(|m| m.modified()) {
            Ok(time) => Some(time),
            Err(e) => {
                tracing::debug!("Cannot read mtime of {}: {}", path.display(), e);
                None
            }
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Resolve the program named by the first word of a command in `PATH`.
///
/// Used to warn early about a misconfigured compiler; commands such as
/// `ccache gcc` resolve their first word.
pub fn resolve_program(command: &str) -> Option<PathBuf> {
    let program = command.split_whitespace().next()?;
    which::which(program).ok()
}
