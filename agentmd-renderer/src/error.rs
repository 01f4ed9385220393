//! Error types for agentmd-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from walking a template tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("template directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Filesystem error while listing templates.
    #[error("template io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why an include could not be resolved.
#[derive(Debug, Error)]
pub enum CompileReason {
    #[error("include target {target} is unreadable: {source}")]
    Unreadable {
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("include cycle through {target}")]
    Cycle { target: PathBuf },

    #[error("includes nested deeper than {max}")]
    TooDeep { max: usize },
}

/// Include compilation failed for `path` (the file holding the directive).
#[derive(Debug, Error)]
#[error("failed to compile {path}: {reason}")]
pub struct CompileError {
    pub path: PathBuf,
    #[source]
    pub reason: CompileReason,
}
