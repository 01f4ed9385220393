//! Workspace path helpers.
//!
//! Everything here is pure: no filesystem access, no environment lookups.
//! Callers pass the home directory and base directories explicitly.

use std::path::{Component, Path, PathBuf};

/// Strip trailing path separators. A bare root (`/`) is returned unchanged.
pub fn normalize(path: &Path) -> PathBuf {
    let raw = path.as_os_str().to_string_lossy();
    let trimmed = raw.trim_end_matches(is_separator);
    if trimmed.is_empty() {
        if raw.is_empty() {
            return PathBuf::new();
        }
        // Only separators: keep a single root.
        return PathBuf::from(&raw[..1]);
    }
    PathBuf::from(trimmed)
}

/// `path` if already absolute, otherwise `root.join(path)`.
pub fn to_absolute(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Expand a leading `~` (alone or followed by a separator) against `home`.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix('~') {
        Some(rest) if rest.starts_with(is_separator) => {
            home.join(rest.trim_start_matches(is_separator))
        }
        _ => PathBuf::from(path),
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` above the root of an absolute path is dropped; on a relative path it
/// is kept so an escape stays visible.
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Full workspace normalization used by the config model and the target
/// selector: `~` expansion, trailing separator removal, resolution against
/// `base`, lexical cleanup.
pub fn resolve_workspace(raw: &str, base: &Path, home: &Path) -> PathBuf {
    let expanded = expand_home(raw.trim(), home);
    lexical_clean(&to_absolute(&normalize(&expanded), base))
}

/// `true` iff `candidate` is a strict descendant of `root` after lexical
/// resolution. Equal paths and `..` escapes are not descendants.
pub fn is_descendant(root: &Path, candidate: &Path) -> bool {
    let root = lexical_clean(root);
    let candidate = lexical_clean(&to_absolute(candidate, &root));
    candidate != root && candidate.starts_with(&root)
}

/// Heuristic used by the target selector: does the user-supplied string look
/// like a filesystem path rather than an agent id?
pub fn looks_like_path(selector: &str) -> bool {
    Path::new(selector).is_absolute()
        || selector.contains(is_separator)
        || selector.starts_with('.')
        || selector.starts_with('~')
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
