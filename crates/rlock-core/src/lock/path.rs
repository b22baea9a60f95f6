//! Lock file naming

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the protected file name to form the lock file name
pub const LOCK_SUFFIX: &str = ".lock";

/// Returns the lock file path for a protected resource.
///
/// The suffix is appended to the whole file name rather than replacing the
/// extension, so `runs/data.txt` and `runs/data.csv` get distinct lock files
/// (`runs/data.txt.lock`, `runs/data.csv.lock`). Independent processes agree
/// on the lock file as long as they spell the protected path the same way.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(LOCK_SUFFIX);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            lock_path_for(Path::new("/data/results.h5")),
            PathBuf::from("/data/results.h5.lock")
        );
    }

    #[test]
    fn test_lock_path_keeps_extension_distinct() {
        let txt = lock_path_for(Path::new("out/log.txt"));
        let csv = lock_path_for(Path::new("out/log.csv"));
        assert_ne!(txt, csv);
        assert_eq!(txt, PathBuf::from("out/log.txt.lock"));
    }

    #[test]
    fn test_lock_path_without_extension() {
        assert_eq!(
            lock_path_for(Path::new("counter")),
            PathBuf::from("counter.lock")
        );
    }
}
