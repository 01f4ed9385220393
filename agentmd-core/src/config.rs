//! Agent registry loaded from the JSON config document.
//!
//! # Document shape
//!
//! ```text
//! {
//!   "agents": {
//!     "defaults": { "workspace": "~/.agentmd/workspace" },
//!     "list": [
//!       { "id": "main" },
//!       { "id": "alpha", "workspace": "workspace-alpha" }
//!     ]
//!   }
//! }
//! ```
//!
//! # API pattern
//!
//! - `load_agents_at(config, root, home)` — explicit home; the sync pipeline
//!   passes `Settings::home` so `~` expands the same way everywhere
//! - `load_agents(config, root)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::ConfigError;
use crate::paths;
use crate::types::{AgentEntry, AgentId, WorkspaceSource, DEFAULT_AGENT_ID};

/// Directory name used for the default workspace when the document declares none.
pub const FALLBACK_WORKSPACE_DIR: &str = "workspace";

/// Load and validate the agent list from `config_path`.
///
/// Relative workspaces resolve against `root_dir`, never the process cwd.
pub fn load_agents_at(
    config_path: &Path,
    root_dir: &Path,
    home: &Path,
) -> Result<Vec<AgentEntry>, ConfigError> {
    let doc = read_document(config_path)?;
    agents_from_document(&doc, config_path, root_dir, home)
}

/// `load_agents_at` convenience wrapper.
pub fn load_agents(config_path: &Path, root_dir: &Path) -> Result<Vec<AgentEntry>, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    load_agents_at(config_path, root_dir, &home)
}

fn read_document(config_path: &Path) -> Result<Value, ConfigError> {
    if !config_path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::ConfigParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Derive the normalized agent list from an already-parsed document.
///
/// `config_path` is only used for error messages.
pub fn agents_from_document(
    doc: &Value,
    config_path: &Path,
    root_dir: &Path,
    home: &Path,
) -> Result<Vec<AgentEntry>, ConfigError> {
    let list = doc
        .get("agents")
        .and_then(|agents| agents.get("list"))
        .ok_or_else(|| ConfigError::ConfigShape {
            path: config_path.to_path_buf(),
            detail: "missing `agents.list`".to_string(),
        })?
        .as_array()
        .ok_or_else(|| ConfigError::ConfigShape {
            path: config_path.to_path_buf(),
            detail: "`agents.list` must be an array".to_string(),
        })?;

    let default_workspace = default_workspace(doc, root_dir, home);

    let mut agents: Vec<AgentEntry> = Vec::new();
    for (index, raw) in list.iter().enumerate() {
        let Some(id) = non_empty_str(raw.get("id")) else {
            tracing::debug!(index, "dropping agent entry without an id");
            continue;
        };
        let id = AgentId::from(id);

        let (workspace, source) = match non_empty_str(raw.get("workspace")) {
            Some(ws) => (
                paths::resolve_workspace(ws, root_dir, home),
                WorkspaceSource::Explicit,
            ),
            None if id.is_default() => (default_workspace.clone(), WorkspaceSource::Defaulted),
            None => {
                tracing::debug!(agent = %id, "dropping agent entry without a workspace");
                continue;
            }
        };

        agents.push(AgentEntry {
            id,
            workspace,
            source,
        });
    }

    check_unique(&agents, config_path)?;

    let claims_default = agents
        .iter()
        .any(|a| a.id.is_default() || a.workspace == default_workspace);
    if !claims_default {
        agents.insert(
            0,
            AgentEntry {
                id: AgentId::from(DEFAULT_AGENT_ID),
                workspace: default_workspace,
                source: WorkspaceSource::Synthesized,
            },
        );
    }

    if agents.is_empty() {
        return Err(ConfigError::NoValidAgents {
            path: config_path.to_path_buf(),
        });
    }
    Ok(agents)
}

/// `agents.defaults.workspace`, or `<root_dir>/workspace` when undeclared.
fn default_workspace(doc: &Value, root_dir: &Path, home: &Path) -> PathBuf {
    let declared = doc
        .get("agents")
        .and_then(|agents| agents.get("defaults"))
        .and_then(|defaults| non_empty_str(defaults.get("workspace")));
    match declared {
        Some(ws) => paths::resolve_workspace(ws, root_dir, home),
        None => paths::lexical_clean(&root_dir.join(FALLBACK_WORKSPACE_DIR)),
    }
}

fn check_unique(agents: &[AgentEntry], config_path: &Path) -> Result<(), ConfigError> {
    let mut ids: HashSet<&AgentId> = HashSet::new();
    let mut workspaces: HashMap<&Path, &AgentId> = HashMap::new();
    for agent in agents {
        if !ids.insert(&agent.id) {
            return Err(ConfigError::DuplicateAgentId {
                path: config_path.to_path_buf(),
                id: agent.id.0.clone(),
            });
        }
        if let Some(first) = workspaces.insert(agent.workspace.as_path(), &agent.id) {
            return Err(ConfigError::DuplicateWorkspace {
                workspace: agent.workspace.clone(),
                first: first.0.clone(),
                second: agent.id.0.clone(),
            });
        }
    }
    Ok(())
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
