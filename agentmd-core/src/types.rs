//! Domain types for the agent registry.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identifier of the agent synthesized from the registry-level default workspace.
pub const DEFAULT_AGENT_ID: &str = "main";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed agent identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the implicit default agent (`main`).
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_AGENT_ID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How an entry's workspace was resolved at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceSource {
    /// The list entry declared its own `workspace`.
    Explicit,
    /// A `main` list entry without `workspace`; the registry default was substituted.
    Defaulted,
    /// No list entry claimed `main`; the whole entry was synthesized.
    Synthesized,
}

impl fmt::Display for WorkspaceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkspaceSource::Explicit => write!(f, "explicit"),
            WorkspaceSource::Defaulted => write!(f, "defaulted"),
            WorkspaceSource::Synthesized => write!(f, "synthesized"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One agent's identity and destination, derived once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub id: AgentId,
    /// Absolute, normalized workspace directory.
    pub workspace: PathBuf,
    pub source: WorkspaceSource,
}

impl AgentEntry {
    pub fn new(id: impl Into<AgentId>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            workspace: workspace.into(),
            source: WorkspaceSource::Explicit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_display() {
        assert_eq!(AgentId::from("alpha").to_string(), "alpha");
    }

    #[test]
    fn default_agent_detection() {
        assert!(AgentId::from("main").is_default());
        assert!(!AgentId::from("Main").is_default());
    }

    #[test]
    fn workspace_source_serializes_lowercase() {
        let json = serde_json::to_string(&WorkspaceSource::Synthesized).unwrap();
        assert_eq!(json, "\"synthesized\"");
    }
}
