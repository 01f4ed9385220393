//! Default template tree baked into the binary at compile time via `include_str!`.
//!
//! # Layout written by `agentmd init`
//!
//! | Path                              | Source                      |
//! |-----------------------------------|-----------------------------|
//! | `.includes/<fragment>.md`         | [`SHARED_INCLUDES`]         |
//! | `<agent-id>/<entrypoint>.md`      | [`ENTRYPOINTS`]             |
//!
//! Entrypoints reference fragments as `#include "../.includes/<fragment>.md"`,
//! so they compile correctly from any `<agent-id>/` directory.

/// Directory under the template root holding shared fragments.
pub const INCLUDES_DIR: &str = ".includes";

/// Shared include fragments: `(file name, contents)`.
pub const SHARED_INCLUDES: &[(&str, &str)] = &[
    ("header.md", include_str!("skeleton/includes/header.md")),
    ("memory.md", include_str!("skeleton/includes/memory.md")),
    ("safety.md", include_str!("skeleton/includes/safety.md")),
    ("tools.md", include_str!("skeleton/includes/tools.md")),
];

/// Per-agent entrypoint templates: `(file name, contents)`.
pub const ENTRYPOINTS: &[(&str, &str)] = &[
    ("AGENTS.md", include_str!("skeleton/entrypoints/AGENTS.md")),
    ("HEARTBEAT.md", include_str!("skeleton/entrypoints/HEARTBEAT.md")),
    ("SOUL.md", include_str!("skeleton/entrypoints/SOUL.md")),
    ("TOOLS.md", include_str!("skeleton/entrypoints/TOOLS.md")),
    ("USER.md", include_str!("skeleton/entrypoints/USER.md")),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::include;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn materialize(root: &Path) {
        let includes = root.join(INCLUDES_DIR);
        fs::create_dir_all(&includes).unwrap();
        for (name, body) in SHARED_INCLUDES {
            fs::write(includes.join(name), body).unwrap();
        }
        let agent = root.join("main");
        fs::create_dir_all(&agent).unwrap();
        for (name, body) in ENTRYPOINTS {
            fs::write(agent.join(name), body).unwrap();
        }
    }

    #[test]
    fn every_entrypoint_compiles_against_shared_includes() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path());
        for (name, _) in ENTRYPOINTS {
            let out = include::compile(&tmp.path().join("main").join(name))
                .unwrap_or_else(|e| panic!("{name} failed to compile: {e}"));
            assert!(!include::has_active_includes(&out), "{name} kept a directive");
        }
    }

    #[test]
    fn agents_md_is_generated_content() {
        let (_, body) = ENTRYPOINTS.iter().find(|(n, _)| *n == "AGENTS.md").unwrap();
        assert!(include::has_active_includes(body));
    }

    #[test]
    fn soul_md_is_user_owned() {
        let (_, body) = ENTRYPOINTS.iter().find(|(n, _)| *n == "SOUL.md").unwrap();
        assert!(!include::has_active_includes(body));
    }

    #[test]
    fn no_crlf_in_embedded_templates() {
        for (name, body) in SHARED_INCLUDES.iter().chain(ENTRYPOINTS) {
            assert!(!body.contains('\r'), "{name} contains CR");
        }
    }
}
