//! `#include` directive compiler for markdown templates.
//!
//! # Syntax
//!
//! A directive is a line whose trimmed content is
//!
//! ```text
//! #include "relative/or/absolute/path.md"
//! ```
//!
//! (single quotes work too). The whole line is replaced by the compiled
//! contents of the target. Targets resolve against the directory of the file
//! that holds the directive, so fragments can include their own siblings.
//! Directives inside fenced code blocks (```` ``` ```` or `~~~`) are inert.
//!
//! The base directory is always passed explicitly; the process working
//! directory is never consulted or changed.

use std::path::{Path, PathBuf};

use crate::error::{CompileError, CompileReason};

/// Maximum include nesting before compilation gives up.
pub const MAX_INCLUDE_DEPTH: usize = 32;

const DIRECTIVE: &str = "#include";

/// `true` if `contents` holds at least one directive outside a code fence.
pub fn has_active_includes(contents: &str) -> bool {
    let mut fence = FenceState::default();
    contents.lines().any(|line| {
        if fence.observe(line) {
            return false;
        }
        parse_directive(line).is_some()
    })
}

/// Read `path` and resolve every directive transitively.
///
/// Output always uses LF line endings.
pub fn compile(path: &Path) -> Result<String, CompileError> {
    let contents = std::fs::read_to_string(path).map_err(|e| CompileError {
        path: path.to_path_buf(),
        reason: CompileReason::Unreadable {
            target: path.to_path_buf(),
            source: e,
        },
    })?;
    compile_str(&contents, path)
}

/// Resolve directives in an in-memory document.
///
/// `origin` names the document for error messages and anchors relative
/// targets: they resolve against `origin`'s parent directory. If `origin`
/// exists on disk it also seeds cycle detection.
pub(crate) fn compile_str(contents: &str, origin: &Path) -> Result<String, CompileError> {
    let mut stack = Vec::new();
    if let Ok(canonical) = origin.canonicalize() {
        stack.push(canonical);
    }
    compile_with_stack(contents, origin, &mut stack)
}

fn compile_with_stack(
    contents: &str,
    origin: &Path,
    stack: &mut Vec<PathBuf>,
) -> Result<String, CompileError> {
    let base_dir = origin.parent().unwrap_or_else(|| Path::new(""));
    let fail = |reason: CompileReason| CompileError {
        path: origin.to_path_buf(),
        reason,
    };

    let mut out = String::with_capacity(contents.len());
    let mut fence = FenceState::default();

    for raw in contents.split_inclusive('\n') {
        let had_newline = raw.ends_with('\n');
        let line = raw.trim_end_matches(&['\n', '\r'][..]);

        let target = if fence.observe(line) {
            None
        } else {
            parse_directive(line)
        };

        let Some(target) = target else {
            out.push_str(line);
            if had_newline {
                out.push('\n');
            }
            continue;
        };

        if stack.len() >= MAX_INCLUDE_DEPTH {
            return Err(fail(CompileReason::TooDeep {
                max: MAX_INCLUDE_DEPTH,
            }));
        }

        let target_path = base_dir.join(target);
        let canonical = target_path.canonicalize().map_err(|e| {
            fail(CompileReason::Unreadable {
                target: target_path.clone(),
                source: e,
            })
        })?;
        if stack.contains(&canonical) {
            return Err(fail(CompileReason::Cycle {
                target: target_path,
            }));
        }
        let included = std::fs::read_to_string(&canonical).map_err(|e| {
            fail(CompileReason::Unreadable {
                target: target_path.clone(),
                source: e,
            })
        })?;

        tracing::debug!(from = %origin.display(), target = %target_path.display(), "resolving include");
        stack.push(canonical);
        let expanded = compile_with_stack(&included, &target_path, stack)?;
        stack.pop();

        out.push_str(&expanded);
        if had_newline && !expanded.is_empty() && !expanded.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}

/// Return the quoted target of a directive line, if `line` is one.
fn parse_directive(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(DIRECTIVE)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = &rest[1..];
    let end = inner.find(quote)?;
    let target = &inner[..end];
    if target.trim().is_empty() || !inner[end + 1..].trim().is_empty() {
        return None;
    }
    Some(target)
}

/// Tracks whether the scanner sits inside a fenced code block.
#[derive(Default)]
struct FenceState {
    open: Option<char>,
}

impl FenceState {
    /// Feed one line; returns `true` if the line is a fence marker or sits
    /// inside a fence (and so cannot hold an active directive).
    fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let marker = if trimmed.starts_with("```") {
            Some('`')
        } else if trimmed.starts_with("~~~") {
            Some('~')
        } else {
            None
        };
        match (self.open, marker) {
            (None, Some(m)) => {
                self.open = Some(m);
                true
            }
            (Some(open), Some(m)) if open == m => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn parses_double_and_single_quoted_directives() {
        assert_eq!(parse_directive("#include \"a.md\""), Some("a.md"));
        assert_eq!(parse_directive("  #include   '../x/b.md'  "), Some("../x/b.md"));
    }

    #[test]
    fn rejects_near_misses() {
        assert_eq!(parse_directive("#includes \"a.md\""), None);
        assert_eq!(parse_directive("#include a.md"), None);
        assert_eq!(parse_directive("#include \"\""), None);
        assert_eq!(parse_directive("#include \"a.md\" trailing"), None);
        assert_eq!(parse_directive("# include \"a.md\""), None);
        assert_eq!(parse_directive("text #include \"a.md\""), None);
    }

    #[test]
    fn detects_active_includes() {
        assert!(has_active_includes("# Title\n#include \"h.md\"\n"));
        assert!(!has_active_includes("# Title\nplain text\n"));
    }

    #[test]
    fn fenced_directives_are_inert() {
        let doc = "```md\n#include \"h.md\"\n```\n~~~\n#include 'x.md'\n~~~\n";
        assert!(!has_active_includes(doc));
    }

    #[test]
    fn mismatched_fence_marker_does_not_close() {
        let doc = "```\n~~~\n#include \"h.md\"\n```\n#include \"live.md\"\n";
        assert!(has_active_includes(doc));
    }

    #[test]
    fn compile_resolves_relative_to_including_file() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".includes/header.md", "HEADER\n");
        let agents = write(
            tmp.path(),
            "alpha/AGENTS.md",
            "# Alpha\n#include \"../.includes/header.md\"\nbody\n",
        );
        assert_eq!(compile(&agents).unwrap(), "# Alpha\nHEADER\nbody\n");
    }

    #[test]
    fn compile_is_transitive() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), ".includes/inner.md", "inner");
        write(tmp.path(), ".includes/outer.md", "outer\n#include \"inner.md\"\n");
        let top = write(tmp.path(), "alpha/SOUL.md", "#include \"../.includes/outer.md\"\nend\n");
        let out = compile(&top).unwrap();
        assert_eq!(out, "outer\ninner\nend\n");
        assert!(!has_active_includes(&out));
    }

    #[test]
    fn compile_normalizes_crlf() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "frag.md", "a\r\nb\r\n");
        let top = write(tmp.path(), "top.md", "x\r\n#include \"frag.md\"\r\ny\r\n");
        let out = compile(&top).unwrap();
        assert!(!out.contains('\r'));
        assert_eq!(out, "x\na\nb\ny\n");
    }

    #[test]
    fn missing_target_reports_including_file() {
        let tmp = TempDir::new().unwrap();
        let top = write(tmp.path(), "alpha/AGENTS.md", "#include \"../.includes/gone.md\"\n");
        let err = compile(&top).unwrap_err();
        assert_eq!(err.path, top);
        assert!(matches!(err.reason, CompileReason::Unreadable { .. }));
        assert!(err.to_string().contains("AGENTS.md"));
    }

    #[test]
    fn cycles_are_detected() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", "#include \"b.md\"\n");
        write(tmp.path(), "b.md", "#include \"a.md\"\n");
        let err = compile(&tmp.path().join("a.md")).unwrap_err();
        assert!(matches!(err.reason, CompileReason::Cycle { .. }), "got: {err}");
    }

    #[test]
    fn same_fragment_twice_is_not_a_cycle() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "frag.md", "F\n");
        let top = write(tmp.path(), "top.md", "#include \"frag.md\"\n#include \"frag.md\"\n");
        assert_eq!(compile(&top).unwrap(), "F\nF\n");
    }

    #[test]
    fn compile_str_uses_origin_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "frag.md", "F\n");
        let origin = tmp.path().join("virtual.md");
        assert_eq!(compile_str("#include \"frag.md\"\n", &origin).unwrap(), "F\n");
    }

    #[test]
    fn compile_str_detects_self_include_of_existing_origin() {
        let tmp = TempDir::new().unwrap();
        let origin = write(tmp.path(), "self.md", "#include \"self.md\"\n");
        let err = compile_str("#include \"self.md\"\n", &origin).unwrap_err();
        assert!(matches!(err.reason, CompileReason::Cycle { .. }), "got: {err}");
        assert_eq!(err.path, origin);
    }
}
