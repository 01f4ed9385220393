//! Error types for agentmd-sync.

use std::path::PathBuf;

use thiserror::Error;

use agentmd_core::error::ConfigError;
use agentmd_renderer::{CompileError, ScanError};

/// All errors that can arise from scaffolding, selecting, and building.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the agent registry.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// An error walking a template tree.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// An include could not be resolved while building `template`; aborts the whole build.
    #[error("compile error in template {template} of agent '{agent}': {source}")]
    Compile {
        agent: String,
        template: PathBuf,
        #[source]
        source: CompileError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("templates not initialized at {path}; run `agentmd init` first")]
    TemplatesNotInitialized { path: PathBuf },

    #[error("templates already initialized at {path}; pass --force to overwrite")]
    TemplatesAlreadyInitialized { path: PathBuf },

    #[error("shared includes directory missing at {path}; run `agentmd init --force`")]
    SharedIncludesMissing { path: PathBuf },

    #[error("no template directory for agent '{agent}' at {path}; run `agentmd pull-agents`")]
    AgentTemplateMissing { agent: String, path: PathBuf },

    #[error("template directory for agent '{agent}' is empty: {path}; run `agentmd pull-agents`")]
    AgentTemplateEmpty { agent: String, path: PathBuf },

    /// The id cannot be used as a single directory name under the template root.
    #[error("agent id '{agent}' is not a valid template directory name")]
    InvalidAgentId { agent: String },

    #[error(
        "workspace {workspace} of agent '{agent}' is outside {root}; pass --force to build there anyway"
    )]
    WorkspaceOutsideRoot {
        agent: String,
        workspace: PathBuf,
        root: PathBuf,
    },

    /// Building would write into (or wipe) a directory the build reads from.
    #[error("workspace {workspace} of agent '{agent}' contains {input}; choose a workspace outside it")]
    WorkspaceContainsInput {
        agent: String,
        workspace: PathBuf,
        input: PathBuf,
    },

    #[error("no agent matches '{selector}' by workspace or id")]
    AgentNotFound { selector: String },

    #[error("agent id '{id}' matches {count} agents")]
    AmbiguousAgentId { id: String, count: usize },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
