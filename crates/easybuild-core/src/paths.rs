//! Working directory management.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Make sure `dir` can hold objects and the link target.
///
/// Creates the directory (and its parents) if it does not exist. Fails with
/// [`Error::WorkDir`] if the path exists but is not a directory, or if its
/// owner has no access to it.
///
/// # Errors
/// Returns [`Error::Io`] if creating the directory fails.
pub fn ensure_workdir(dir: &Path) -> Result<()> {
    let metadata = match fs::metadata(dir) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            create_workdir(dir)?;
            tracing::debug!("Created working directory {}", dir.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_dir() {
        return Err(Error::WorkDir(format!(
            "{} has been occupied",
            dir.display()
        )));
    }
    if !owner_has_access(&metadata) {
        return Err(Error::WorkDir(format!(
            "{}: permission denied",
            dir.display()
        )));
    }
    Ok(())
}

#[cfg(unix)]
fn create_workdir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(0o770)
        .create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_workdir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(unix)]
fn owner_has_access(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode() & 0o700 != 0
}

#[cfg(not(unix))]
fn owner_has_access(metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}
