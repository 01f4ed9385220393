//! Build target selection.
//!
//! Resolution order for a selector string:
//! 1. exact workspace path match (after `~` expansion, cwd resolution and
//!    normalization);
//! 2. agent id match.
//!
//! Path-like selectors that land outside the sanctioned root are refused
//! unless the caller allows it explicitly.

use std::path::PathBuf;

use agentmd_core::{paths, AgentEntry};

use crate::error::SyncError;

/// Inputs for [`select`] besides the agent list.
#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Workspaces reached through a path-like selector must live under here.
    pub sanctioned_root: PathBuf,
    /// Skip the sanctioned-root check.
    pub allow_outside: bool,
    /// Base for relative path selectors.
    pub cwd: PathBuf,
    pub home: PathBuf,
}

/// Pick the agents a build should act on.
pub fn select(
    agents: &[AgentEntry],
    selector: Option<&str>,
    options: &SelectOptions,
) -> Result<Vec<AgentEntry>, SyncError> {
    let Some(selector) = selector.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(agents.to_vec());
    };

    let wanted = paths::resolve_workspace(selector, &options.cwd, &options.home);
    let by_workspace: Vec<AgentEntry> = agents
        .iter()
        .filter(|a| a.workspace == wanted)
        .cloned()
        .collect();

    if !by_workspace.is_empty() {
        if paths::looks_like_path(selector) && !options.allow_outside {
            if let Some(outside) = by_workspace
                .iter()
                .find(|a| !paths::is_descendant(&options.sanctioned_root, &a.workspace))
            {
                return Err(SyncError::WorkspaceOutsideRoot {
                    agent: outside.id.0.clone(),
                    workspace: outside.workspace.clone(),
                    root: options.sanctioned_root.clone(),
                });
            }
        }
        tracing::debug!(selector, matched = by_workspace.len(), "selected by workspace");
        return Ok(by_workspace);
    }

    let mut by_id: Vec<AgentEntry> = agents
        .iter()
        .filter(|a| a.id.as_str() == selector)
        .cloned()
        .collect();
    match by_id.len() {
        0 => Err(SyncError::AgentNotFound {
            selector: selector.to_string(),
        }),
        1 => Ok(vec![by_id.remove(0)]),
        count => Err(SyncError::AmbiguousAgentId {
            id: selector.to_string(),
            count,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn options(allow_outside: bool) -> SelectOptions {
        SelectOptions {
            sanctioned_root: PathBuf::from("/state"),
            allow_outside,
            cwd: PathBuf::from("/state"),
            home: PathBuf::from("/home/u"),
        }
    }

    fn fleet() -> Vec<AgentEntry> {
        vec![
            AgentEntry::new("main", "/state/workspace"),
            AgentEntry::new("alpha", "/state/workspace-alpha"),
            AgentEntry::new("ops", "/srv/ops"),
        ]
    }

    fn ids(agents: &[AgentEntry]) -> Vec<&str> {
        agents.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn no_selector_returns_everything() {
        let selected = select(&fleet(), None, &options(false)).unwrap();
        assert_eq!(ids(&selected), vec!["main", "alpha", "ops"]);
        let selected = select(&fleet(), Some("  "), &options(false)).unwrap();
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn selects_by_id() {
        let selected = select(&fleet(), Some("alpha"), &options(false)).unwrap();
        assert_eq!(ids(&selected), vec!["alpha"]);
    }

    #[test]
    fn selects_by_workspace_path_with_trailing_slash() {
        let selected = select(&fleet(), Some("/state/workspace-alpha/"), &options(false)).unwrap();
        assert_eq!(ids(&selected), vec!["alpha"]);
    }

    #[test]
    fn relative_path_resolves_against_cwd() {
        let selected = select(&fleet(), Some("./workspace-alpha"), &options(false)).unwrap();
        assert_eq!(ids(&selected), vec!["alpha"]);
    }

    #[test]
    fn workspace_match_takes_precedence_over_id() {
        // An agent whose id equals another agent's workspace directory name.
        let agents = vec![
            AgentEntry::new("workspace", "/elsewhere/ws"),
            AgentEntry::new("main", "/state/workspace"),
        ];
        let selected = select(&agents, Some("workspace"), &options(false)).unwrap();
        assert_eq!(ids(&selected), vec!["main"]);
    }

    #[test]
    fn outside_root_path_selector_is_refused() {
        let err = select(&fleet(), Some("/srv/ops"), &options(false)).unwrap_err();
        assert!(matches!(err, SyncError::WorkspaceOutsideRoot { .. }), "got: {err}");
    }

    #[test]
    fn outside_root_allowed_with_override() {
        let selected = select(&fleet(), Some("/srv/ops"), &options(true)).unwrap();
        assert_eq!(ids(&selected), vec!["ops"]);
    }

    #[test]
    fn id_selector_is_not_path_guarded() {
        let selected = select(&fleet(), Some("ops"), &options(false)).unwrap();
        assert_eq!(selected[0].workspace, Path::new("/srv/ops"));
    }

    #[test]
    fn workspace_equal_to_root_counts_as_outside() {
        let agents = vec![AgentEntry::new("root", "/state")];
        let err = select(&agents, Some("/state"), &options(false)).unwrap_err();
        assert!(matches!(err, SyncError::WorkspaceOutsideRoot { .. }));
    }

    #[test]
    fn unknown_selector_is_not_found() {
        let err = select(&fleet(), Some("beta"), &options(false)).unwrap_err();
        assert!(matches!(err, SyncError::AgentNotFound { .. }), "got: {err}");
        let err = select(&fleet(), Some("/state/workspace-beta"), &options(false)).unwrap_err();
        assert!(matches!(err, SyncError::AgentNotFound { .. }), "got: {err}");
    }

    #[test]
    fn duplicate_ids_are_ambiguous() {
        // Hand-built: the config loader never produces duplicate ids.
        let agents = vec![
            AgentEntry::new("alpha", "/state/a"),
            AgentEntry::new("alpha", "/state/b"),
        ];
        let err = select(&agents, Some("alpha"), &options(false)).unwrap_err();
        assert!(
            matches!(err, SyncError::AmbiguousAgentId { count: 2, .. }),
            "got: {err}"
        );
    }
}
