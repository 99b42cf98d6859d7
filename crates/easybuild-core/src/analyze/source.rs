//! Analyzed source file descriptor.

use std::path::{Path, PathBuf};

use super::language::Language;
use super::linker::Linker;

/// Result of analyzing one source file.
///
/// Built once by the [`SourceAnalyzer`](super::SourceAnalyzer) and immutable
/// afterwards. An empty `command` means the output is already current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path of the source as given to the analyzer
    pub source: PathBuf,
    /// Object file produced from the source
    pub output: PathBuf,
    /// Language the source was classified as
    pub language: Language,
    /// Files the output depends on, in listing order
    pub dependencies: Vec<String>,
    /// Command that rebuilds `output`, empty if up to date
    pub command: String,
    /// Link driver suggested by this file's language
    pub linker: Linker,
}

impl SourceFile {
    /// Whether the output must be rebuilt.
    pub fn needs_rebuild(&self) -> bool {
        !self.command.is_empty()
    }

    /// Short `source => output` description for progress lines.
    pub fn describe(&self) -> String {
        format!("{} => {}", self.source.display(), self.output.display())
    }
}

/// Object path for a source: `<workdir>/<file name>.o`.
///
/// The full file name, extension included, is kept so that `boot.s` and
/// `boot.c` in one project do not collide.
pub fn object_path(workdir: &Path, source: &Path) -> PathBuf {
    let mut name = source
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".o");
    workdir.join(name)
}

/// Join command parts with single spaces, skipping empty parts.
pub fn join_command<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
