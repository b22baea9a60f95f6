//! Atomic replacement of database files

use crate::guard::GuardError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Write content atomically using NamedTempFile + persist
///
/// Readers that open the file without the lock see either the old or the
/// new content, never a mix.
pub(crate) fn atomic_write(content: &str, path: &Path) -> Result<(), GuardError> {
    let parent = parent_dir(path);

    let mut temp_file = NamedTempFile::new_in(parent)
        .map_err(|e| GuardError::io(path, "create temp file", e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| GuardError::io(path, "write temp file", e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| GuardError::io(path, "sync temp file", e))?;

    temp_file
        .persist(path)
        .map_err(|e| GuardError::io(path, "persist temp file", e.error))?;

    // Fsync parent directory for durability (Unix only)
    #[cfg(unix)]
    {
        let parent_file =
            std::fs::File::open(parent).map_err(|e| GuardError::io(path, "open parent dir", e))?;
        parent_file
            .sync_all()
            .map_err(|e| GuardError::io(path, "sync parent dir", e))?;
    }

    Ok(())
}
