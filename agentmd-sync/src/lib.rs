//! # agentmd-sync
//!
//! Template scaffolding, build target selection, and the workspace build engine.
//!
//! Call [`pipeline::run_build`] to load the registry, pick targets, and render
//! templates into workspaces, or use [`engine::build`] directly with an
//! already-selected agent list.

pub mod doctor;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod scaffold;
pub mod select;
pub mod writer;

pub use engine::{build, BuildOptions, BuildOutcome, FileAction, SkipReason};
pub use error::SyncError;
pub use select::{select, SelectOptions};
