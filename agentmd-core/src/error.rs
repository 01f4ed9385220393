//! Error types for agentmd-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading the agent registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config document did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Underlying I/O failure while reading the config document.
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load — includes file path and line context from serde_json.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `agents.list` is missing or is not an array.
    #[error("invalid config at {path}: {detail}")]
    ConfigShape { path: PathBuf, detail: String },

    #[error("duplicate agent id '{id}' in {path}")]
    DuplicateAgentId { path: PathBuf, id: String },

    /// Two agents resolve to the same normalized workspace directory.
    #[error("agents '{first}' and '{second}' share workspace {workspace}")]
    DuplicateWorkspace {
        workspace: PathBuf,
        first: String,
        second: String,
    },

    #[error("no valid agents found in {path}")]
    NoValidAgents { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
