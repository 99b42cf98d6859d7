//! Error types for easybuild-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for easybuild-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in easybuild-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration key the engine reads was not provided.
    #[error("missing option: {0}")]
    MissingOption(String),

    /// A configuration value could not be interpreted.
    #[error("invalid value for option {key}: {value} ({reason})")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    /// Dependency listing produced fewer than two tokens.
    #[error(
        "failed to calculate dependencies\n    file:     {}\n    compiler: {compiler}\n    flags:    {flags}",
        source_path.display()
    )]
    DependencyScan {
        source_path: PathBuf,
        compiler: String,
        flags: String,
    },

    /// Two sources share a file name and would overwrite each other's object.
    #[error(
        "sources {} and {} both compile to {}",
        first.display(),
        second.display(),
        output.display()
    )]
    OutputCollision {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// One or more compile commands exited non-zero.
    #[error("failed to compile {}", failures.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    CompileFailed { failures: Vec<PathBuf> },

    /// The link command exited non-zero.
    #[error("failed to link (exit status {status}): {command}")]
    LinkFailed { command: String, status: i32 },

    /// The working directory cannot be used.
    #[error("working directory {0}")]
    WorkDir(String),

    /// An input path is neither a file nor a directory.
    #[error("invalid path: {0}")]
    Discover(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DependencyScan { .. } => 2,
            Self::CompileFailed { .. } => 3,
            Self::LinkFailed { .. } => 4,
            _ => 1,
        }
    }

    /// Render the error together with a recovery hint, if one applies.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::MissingOption(_) | Self::InvalidOption { .. } => {
                Some("run `eb --help` to list the accepted options")
            }
            Self::DependencyScan { .. } => {
                Some("check that the compiler exists and accepts -MM with the given flags")
            }
            Self::OutputCollision { .. } => {
                Some("object names come from the file name alone; rename one of the sources")
            }
            Self::CompileFailed { .. } => Some("fix the compiler errors above and rerun"),
            Self::LinkFailed { .. } => {
                Some("check --ld/--ldflags, or rerun with --verbose to see the full command")
            }
            Self::WorkDir(_) => Some("pass a writable directory with --workdir"),
            Self::Discover(_) | Self::Io(_) => None,
        };
        match hint {
            Some(hint) => format!("{}\n  hint: {}", self, hint),
            None => self.to_string(),
        }
    }
}
