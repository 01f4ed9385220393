//! # agentmd-renderer
//!
//! Template tree scanning and `#include` compilation for agent workspaces.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use agentmd_renderer::{include, scan};
//!
//! fn render_all(agent_templates: &Path) {
//!     if let Ok(files) = scan::list_files(agent_templates) {
//!         for file in files {
//!             if let Ok(text) = include::compile(&file.absolute_path) {
//!                 println!("{}: {} bytes", file.relative_path.display(), text.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod error;
pub mod include;
pub mod scan;
pub mod skeleton;

pub use error::{CompileError, CompileReason, ScanError};
pub use include::{compile, has_active_includes};
pub use scan::{list_files, TemplateFile};
