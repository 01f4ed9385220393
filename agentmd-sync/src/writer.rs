//! File writers used by the build engine.
//!
//! ## `atomic_write` protocol (compiled output)
//!
//! 1. Ensure the parent directory exists.
//! 2. Write to `<path>.agentmd.tmp`.
//! 3. Rename to final path (atomic on POSIX).
//! 4. On rename failure remove the `.tmp` and leave the original untouched.
//!
//! Raw template copies go through [`copy_file`], which keeps permission bits.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Suffix of the sibling temp file used by [`atomic_write`].
pub const TMP_SUFFIX: &str = "agentmd.tmp";

/// Atomically replace `path` with `content`.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.{TMP_SUFFIX}", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), SyncError> {
    ensure_parent(path)?;
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

/// Copy raw bytes from `src` to `dest`, replacing `dest` if present.
pub(crate) fn copy_file(src: &Path, dest: &Path) -> Result<(), SyncError> {
    ensure_parent(dest)?;
    std::fs::copy(src, dest).map_err(|e| io_err(dest, e))?;
    Ok(())
}

/// Create `path`'s parent directory (recursively) if it is missing.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file_and_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("memory").join("notes").join("AGENTS.md");
        atomic_write(&path, "content").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn tmp_file_removed_after_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("clean.md");
        atomic_write(&path, "data").unwrap();
        let tmp_path = PathBuf::from(format!("{}.{TMP_SUFFIX}", path.display()));
        assert!(!tmp_path.exists(), ".agentmd.tmp must be cleaned up");
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("AGENTS.md");
        fs::write(&path, "old").unwrap();
        atomic_write(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn copy_file_preserves_bytes() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("logo.bin");
        fs::write(&src, [0u8, 159, 146, 150, 255]).unwrap();
        let dest = tmp.path().join("out").join("logo.bin");
        copy_file(&src, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), vec![0u8, 159, 146, 150, 255]);
    }

    #[test]
    #[cfg(unix)]
    fn rename_failure_leaves_original_and_cleans_tmp() {
        use std::os::unix::fs::PermissionsExt;

        let root = TempDir::new().unwrap();
        let readonly_dir = root.path().join("readonly");
        fs::create_dir_all(&readonly_dir).unwrap();

        let path = readonly_dir.join("file.md");
        fs::write(&path, "original").unwrap();

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o555);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        let tmp_dir = TempDir::new().unwrap();
        let tmp_path = tmp_dir.path().join("file.md.agentmd.tmp");

        let result = atomic_write_with_tmp(&path, "new content", &tmp_path);

        let mut perms = fs::metadata(&readonly_dir).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&readonly_dir, perms).unwrap();

        // Root ignores directory permissions; only assert when the rename was refused.
        if result.is_err() {
            assert_eq!(fs::read_to_string(&path).unwrap(), "original");
            assert!(!tmp_path.exists(), ".agentmd.tmp should be cleaned up");
        }
    }
}
