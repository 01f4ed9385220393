//! Template tree scanner.
//!
//! Depth-first walk, entries sorted by file name at every level so build
//! output and test expectations are deterministic.

use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// One regular file under a template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the scanned root.
    pub relative_path: PathBuf,
    pub absolute_path: PathBuf,
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScanError {
    ScanError::Io {
        path: path.into(),
        source,
    }
}

/// List every regular file under `root`, depth-first, lexicographic per level.
pub fn list_files(root: &Path) -> Result<Vec<TemplateFile>, ScanError> {
    let meta = match std::fs::metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScanError::NotFound {
                path: root.to_path_buf(),
            })
        }
        Err(e) => return Err(io_err(root, e)),
    };
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    collect_files(root, root, &mut files)?;
    Ok(files)
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<TemplateFile>) -> Result<(), ScanError> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_files(root, &path, out)?;
        } else if meta.is_file() {
            let relative_path = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            out.push(TemplateFile {
                relative_path,
                absolute_path: path,
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
