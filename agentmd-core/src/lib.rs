//! agentmd core library — agent registry, path rules, settings, errors.
//!
//! Public API surface:
//! - [`types`] — [`AgentEntry`] and friends
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load and validate the agent registry
//! - [`paths`] — pure workspace path helpers
//! - [`settings`] — flag > env > default root resolution

pub mod config;
pub mod error;
pub mod paths;
pub mod settings;
pub mod types;

pub use error::ConfigError;
pub use settings::{Settings, SettingsOverrides};
pub use types::{AgentEntry, AgentId, WorkspaceSource, DEFAULT_AGENT_ID};
