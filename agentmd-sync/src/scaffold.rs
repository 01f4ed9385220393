//! `init` and `pull-agents`: materialize the embedded skeleton on disk.

use std::path::{Path, PathBuf};

use agentmd_core::{AgentEntry, AgentId};
use agentmd_renderer::skeleton::{ENTRYPOINTS, INCLUDES_DIR, SHARED_INCLUDES};

use crate::engine::{agent_template_dir, is_empty_dir};
use crate::error::{io_err, SyncError};

/// Files written by a scaffolding run.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    pub template_root: PathBuf,
    pub agents: Vec<AgentId>,
    pub written: Vec<PathBuf>,
}

/// Create the template tree: `.includes/` plus one directory per agent.
///
/// A non-empty template root is refused unless `force`; with `force` the
/// skeleton files are rewritten and anything else is left in place.
pub fn init(
    template_root: &Path,
    agents: &[AgentEntry],
    force: bool,
) -> Result<ScaffoldReport, SyncError> {
    if template_root.is_dir() && !is_empty_dir(template_root)? && !force {
        return Err(SyncError::TemplatesAlreadyInitialized {
            path: template_root.to_path_buf(),
        });
    }

    let mut report = ScaffoldReport {
        template_root: template_root.to_path_buf(),
        ..ScaffoldReport::default()
    };

    let includes = template_root.join(INCLUDES_DIR);
    write_all(&includes, SHARED_INCLUDES, &mut report.written)?;

    for agent in agents {
        let dir = agent_template_dir(template_root, &agent.id)?;
        write_all(&dir, ENTRYPOINTS, &mut report.written)?;
        report.agents.push(agent.id.clone());
    }

    tracing::info!(
        root = %template_root.display(),
        agents = report.agents.len(),
        files = report.written.len(),
        "templates initialized"
    );
    Ok(report)
}

/// Add template directories for agents that do not have one yet.
///
/// Existing, non-empty agent directories are never touched.
pub fn pull_agents(template_root: &Path, agents: &[AgentEntry]) -> Result<ScaffoldReport, SyncError> {
    if !template_root.is_dir() {
        return Err(SyncError::TemplatesNotInitialized {
            path: template_root.to_path_buf(),
        });
    }

    let mut report = ScaffoldReport {
        template_root: template_root.to_path_buf(),
        ..ScaffoldReport::default()
    };
    for agent in agents {
        let dir = agent_template_dir(template_root, &agent.id)?;
        if dir.is_dir() && !is_empty_dir(&dir)? {
            tracing::debug!(agent = %agent.id, "template directory already present");
            continue;
        }
        write_all(&dir, ENTRYPOINTS, &mut report.written)?;
        tracing::info!(agent = %agent.id, "added template directory");
        report.agents.push(agent.id.clone());
    }
    Ok(report)
}

fn write_all(
    dir: &Path,
    files: &[(&str, &str)],
    written: &mut Vec<PathBuf>,
) -> Result<(), SyncError> {
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    for (name, contents) in files {
        let path = dir.join(name);
        std::fs::write(&path, contents).map_err(|e| io_err(&path, e))?;
        written.push(path);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
