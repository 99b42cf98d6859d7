//! Candidate source collection.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Expand files and directories into a sorted list of candidate sources.
///
/// Files are taken as given. Directories are walked recursively, skipping
/// anything whose name starts with `.`, and every file with an extension is
/// collected. An empty `inputs` means the current directory.
///
/// Whether a candidate is actually a C, C++ or assembly source is decided
/// later by the analyzer.
pub fn collect_sources<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    if inputs.is_empty() {
        walk(Path::new("."), &mut sources);
    }
    for input in inputs {
        let input = input.as_ref();
        if input.is_file() {
            sources.push(input.to_path_buf());
        } else if input.is_dir() {
            walk(input, &mut sources);
        } else {
            return Err(Error::Discover(input.display().to_string()));
        }
    }

    sources.sort();
    sources.dedup();
    tracing::debug!("Collected {} candidate sources", sources.len());
    Ok(sources)
}

fn walk(dir: &Path, sources: &mut Vec<PathBuf>) {
    let entries = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && entry.path().extension().is_some() {
            sources.push(entry.into_path());
        }
    }
}
