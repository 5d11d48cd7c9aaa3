//! Atomic file replacement
//!
//! Write pattern:
//! 1. Create `<name>.<pid>.tmp` next to the target; it must not exist yet
//! 2. Write and fsync the temp file
//! 3. Rename over the target (atomic on POSIX)
//! 4. fsync the parent directory
//!
//! On failure the temp file is removed only if this call created it, and
//! the target is left as it was.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use super::errors::{PersistenceError, PersistenceResult};

/// Returns the temp path this process uses while writing `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", process::id()));
    path.with_file_name(name)
}

/// Writes `contents` to `path`, replacing any existing file atomically.
pub fn write_atomic(path: &Path, contents: &[u8]) -> PersistenceResult<()> {
    let temp_path = temp_path_for(path);

    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| {
            PersistenceError::io(
                format!("Failed to create temp file: {}", temp_path.display()),
                e,
            )
        })?;

    let result = write_and_commit(file, path, &temp_path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_commit(
    mut file: File,
    path: &Path,
    temp_path: &Path,
    contents: &[u8],
) -> PersistenceResult<()> {
    file.write_all(contents).map_err(|e| {
        PersistenceError::io(format!("Failed to write: {}", temp_path.display()), e)
    })?;

    file.sync_all().map_err(|e| {
        PersistenceError::io(format!("fsync failed: {}", temp_path.display()), e)
    })?;
    drop(file);

    fs::rename(temp_path, path).map_err(|e| {
        PersistenceError::io(
            format!("Failed to move {} into place", path.display()),
            e,
        )
    })?;

    // Make the rename durable
    if let Some(parent) = path.parent() {
        let dir = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(handle) = File::open(dir) {
            let _ = handle.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_sits_next_to_target() {
        let temp = temp_path_for(Path::new("/data/out/coverage.sct"));
        assert_eq!(
            temp,
            PathBuf::from(format!("/data/out/coverage.sct.{}.tmp", process::id()))
        );
    }

    #[test]
    fn test_existing_file_at_temp_path_is_never_touched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"old").unwrap();
        let temp = temp_path_for(&path);
        fs::write(&temp, b"someone else's").unwrap();

        let err = write_atomic(&path, b"new").unwrap_err();
        assert_eq!(err.code(), "SATCOV_PERSIST_IO_ERROR");
        assert_eq!(fs::read(&temp).unwrap(), b"someone else's");
        assert_eq!(fs::read(&path).unwrap(), b"old");
    }

    #[test]
    fn test_plain_tmp_sibling_survives_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        let sibling = dir.path().join("a.bin.tmp");
        fs::write(&sibling, b"user data").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&sibling).unwrap(), b"user data");
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        write_atomic(&path, b"hello").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.bin");
        fs::write(&path, b"old contents").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_dir").join("a.bin");

        let err = write_atomic(&path, b"data").unwrap_err();
        assert_eq!(err.code(), "SATCOV_PERSIST_IO_ERROR");
        assert!(!path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_failed_rename_keeps_existing_target() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the target path cannot be replaced by a file.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(write_atomic(&path, b"data").is_err());
        assert!(path.join("keep").exists());
        assert!(!temp_path_for(&path).exists());
    }
}
