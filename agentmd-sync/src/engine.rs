//! Build engine: render `<template-root>/<agent-id>/` into each agent workspace.
//!
//! ## Per-file decision table
//!
//! | File kind | Condition                             | Action                  |
//! |-----------|---------------------------------------|-------------------------|
//! | `.md`     | has active `#include` directives      | compile, always write   |
//! | any       | destination absent                    | copy                    |
//! | any       | destination present, no `overwrite`   | skip                    |
//! | any       | destination present, `overwrite`      | copy over               |
//!
//! Anything under a `.git` path segment is skipped outright, and `wipe` never
//! removes the workspace's own `.git`.
//!
//! A compile failure aborts the whole build. Agents finished before the
//! failure keep their output; there is no rollback.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use agentmd_core::{paths, AgentEntry, AgentId};
use agentmd_renderer::{include, scan, skeleton::INCLUDES_DIR, TemplateFile};

use crate::error::{io_err, SyncError};
use crate::writer;

/// Name of version-control metadata that is never written or wiped.
pub const GIT_DIR: &str = ".git";

// ---------------------------------------------------------------------------
// Options & outcomes
// ---------------------------------------------------------------------------

/// Flags for a build run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Replace existing destination files that are not generated content.
    pub overwrite: bool,
    /// Clear the workspace (except `.git`) before writing.
    pub wipe: bool,
}

/// Why a template file was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Destination exists and `overwrite` is off.
    Exists,
    /// The template path crosses a `.git` segment.
    GitMetadata,
}

/// What happened to one template file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    Copied,
    Overwritten,
    Compiled,
    Skipped(SkipReason),
}

impl FileAction {
    pub fn is_write(&self) -> bool {
        !matches!(self, FileAction::Skipped(_))
    }
}

/// Outcome for one template file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub relative_path: PathBuf,
    pub destination: PathBuf,
    pub action: FileAction,
}

/// Outcome for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentBuild {
    pub agent_id: AgentId,
    pub workspace: PathBuf,
    /// Workspace children deleted by `wipe`.
    pub removed: Vec<PathBuf>,
    pub files: Vec<FileOutcome>,
}

/// Aggregate outcome of a build run, reported once after the last agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub agents: Vec<AgentBuild>,
    pub files_written: usize,
    pub files_skipped: usize,
}

impl BuildOutcome {
    pub fn agents_processed(&self) -> usize {
        self.agents.len()
    }

    fn record(&mut self, agent: AgentBuild) {
        for file in &agent.files {
            if file.action.is_write() {
                self.files_written += 1;
            } else {
                self.files_skipped += 1;
            }
        }
        self.agents.push(agent);
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// `<template_root>/<agent-id>/`, rejecting ids that are not a single plain
/// directory name.
pub fn agent_template_dir(template_root: &Path, id: &AgentId) -> Result<PathBuf, SyncError> {
    let mut components = Path::new(id.as_str()).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if id.as_str() != INCLUDES_DIR => {
            Ok(template_root.join(id.as_str()))
        }
        _ => Err(SyncError::InvalidAgentId {
            agent: id.0.clone(),
        }),
    }
}

/// Fail fast before anything is written.
pub fn check_preconditions(template_root: &Path, agents: &[AgentEntry]) -> Result<(), SyncError> {
    if !template_root.is_dir() {
        return Err(SyncError::TemplatesNotInitialized {
            path: template_root.to_path_buf(),
        });
    }
    let includes = template_root.join(INCLUDES_DIR);
    if !includes.is_dir() {
        return Err(SyncError::SharedIncludesMissing { path: includes });
    }
    for agent in agents {
        check_workspace_clear_of(agent, template_root)?;
        let dir = agent_template_dir(template_root, &agent.id)?;
        if !dir.is_dir() {
            return Err(SyncError::AgentTemplateMissing {
                agent: agent.id.0.clone(),
                path: dir,
            });
        }
        if is_empty_dir(&dir)? {
            return Err(SyncError::AgentTemplateEmpty {
                agent: agent.id.0.clone(),
                path: dir,
            });
        }
    }
    Ok(())
}

/// Reject a workspace that is `input` or one of its ancestors.
pub fn check_workspace_clear_of(agent: &AgentEntry, input: &Path) -> Result<(), SyncError> {
    let workspace = paths::lexical_clean(&agent.workspace);
    let input = paths::lexical_clean(input);
    if workspace == input || paths::is_descendant(&workspace, &input) {
        return Err(SyncError::WorkspaceContainsInput {
            agent: agent.id.0.clone(),
            workspace: agent.workspace.clone(),
            input,
        });
    }
    Ok(())
}

pub(crate) fn is_empty_dir(dir: &Path) -> Result<bool, SyncError> {
    let mut entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    Ok(entries.next().is_none())
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// Render every agent's template directory into its workspace.
pub fn build(
    template_root: &Path,
    agents: &[AgentEntry],
    options: BuildOptions,
) -> Result<BuildOutcome, SyncError> {
    check_preconditions(template_root, agents)?;

    let mut outcome = BuildOutcome::default();
    for agent in agents {
        let result = build_agent(template_root, agent, options)?;
        outcome.record(result);
    }
    tracing::info!(
        agents = outcome.agents_processed(),
        written = outcome.files_written,
        skipped = outcome.files_skipped,
        "build finished"
    );
    Ok(outcome)
}

fn build_agent(
    template_root: &Path,
    agent: &AgentEntry,
    options: BuildOptions,
) -> Result<AgentBuild, SyncError> {
    let workspace = &agent.workspace;
    std::fs::create_dir_all(workspace).map_err(|e| io_err(workspace, e))?;

    let removed = if options.wipe {
        wipe_workspace(workspace)?
    } else {
        Vec::new()
    };

    let source_dir = agent_template_dir(template_root, &agent.id)?;
    let mut files = Vec::new();
    for file in scan::list_files(&source_dir)? {
        let destination = workspace.join(&file.relative_path);
        let action = sync_file(&agent.id, &file, &destination, options.overwrite)?;
        match action {
            FileAction::Skipped(reason) => {
                tracing::debug!(agent = %agent.id, ?reason, "skipped: {}", destination.display())
            }
            _ => tracing::info!(agent = %agent.id, ?action, "wrote: {}", destination.display()),
        }
        files.push(FileOutcome {
            relative_path: file.relative_path,
            destination,
            action,
        });
    }

    Ok(AgentBuild {
        agent_id: agent.id.clone(),
        workspace: workspace.clone(),
        removed,
        files,
    })
}

/// Delete every direct child of `workspace` except `.git`.
fn wipe_workspace(workspace: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let mut entries = std::fs::read_dir(workspace)
        .map_err(|e| io_err(workspace, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(workspace, e))?;
    entries.sort_by_key(|e| e.file_name());

    let mut removed = Vec::new();
    for entry in entries {
        if entry.file_name() == GIT_DIR {
            continue;
        }
        let path = entry.path();
        // file_type() does not follow symlinks, so a linked directory is unlinked, not emptied.
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            std::fs::remove_dir_all(&path).map_err(|e| io_err(&path, e))?;
        } else {
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        }
        tracing::info!("removed: {}", path.display());
        removed.push(path);
    }
    Ok(removed)
}

/// Apply the decision table to one template file.
fn sync_file(
    agent_id: &AgentId,
    file: &TemplateFile,
    destination: &Path,
    overwrite: bool,
) -> Result<FileAction, SyncError> {
    if has_git_segment(&file.relative_path) {
        return Ok(FileAction::Skipped(SkipReason::GitMetadata));
    }
    writer::ensure_parent(destination)?;

    if is_markdown(&file.absolute_path) {
        let bytes =
            std::fs::read(&file.absolute_path).map_err(|e| io_err(&file.absolute_path, e))?;
        let has_includes = std::str::from_utf8(&bytes)
            .map(include::has_active_includes)
            .unwrap_or(false);
        if has_includes {
            let compiled =
                include::compile(&file.absolute_path).map_err(|e| SyncError::Compile {
                    agent: agent_id.0.clone(),
                    template: file.absolute_path.clone(),
                    source: e,
                })?;
            writer::atomic_write(destination, &compiled)?;
            return Ok(FileAction::Compiled);
        }
    }

    let existed = destination.exists();
    if existed && !overwrite {
        return Ok(FileAction::Skipped(SkipReason::Exists));
    }
    writer::copy_file(&file.absolute_path, destination)?;
    Ok(if existed {
        FileAction::Overwritten
    } else {
        FileAction::Copied
    })
}

fn has_git_segment(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == GIT_DIR))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "md")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
