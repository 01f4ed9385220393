//! Read-only health report for `agentmd doctor`.

use std::path::PathBuf;

use serde::Serialize;

use agentmd_core::{config, paths, AgentId, Settings, WorkspaceSource};
use agentmd_renderer::skeleton::INCLUDES_DIR;

use crate::engine::{agent_template_dir, is_empty_dir};

/// State of one agent's template directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    Ok,
    Missing,
    Empty,
    /// The id cannot name a template directory.
    Invalid,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentCheck {
    pub id: AgentId,
    pub workspace: PathBuf,
    pub source: WorkspaceSource,
    pub template: TemplateStatus,
    pub workspace_exists: bool,
    pub inside_root: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    pub root_dir: PathBuf,
    pub config_path: PathBuf,
    pub templates_dir: PathBuf,
    /// Rendered config error, if the registry failed to load.
    pub config_error: Option<String>,
    pub templates_initialized: bool,
    pub shared_includes: bool,
    pub agents: Vec<AgentCheck>,
}

impl DoctorReport {
    /// Human-readable problems that would make `build` fail.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(err) = &self.config_error {
            problems.push(err.clone());
        }
        if !self.templates_initialized {
            problems.push(format!(
                "templates not initialized at {}; run `agentmd init`",
                self.templates_dir.display()
            ));
        } else if !self.shared_includes {
            problems.push(format!(
                "shared includes missing under {}",
                self.templates_dir.display()
            ));
        }
        if self.templates_initialized {
            for agent in &self.agents {
                let problem = match agent.template {
                    TemplateStatus::Ok => continue,
                    TemplateStatus::Missing => "has no template directory",
                    TemplateStatus::Empty => "has an empty template directory",
                    TemplateStatus::Invalid => "is not a valid directory name",
                };
                problems.push(format!("agent '{}' {problem}", agent.id));
            }
        }
        problems
    }
}

/// Inspect settings, config, and template tree without writing anything.
pub fn diagnose(settings: &Settings) -> DoctorReport {
    let templates_initialized = settings.templates_dir.is_dir();
    let shared_includes = settings.templates_dir.join(INCLUDES_DIR).is_dir();

    let (agents, config_error) =
        match config::load_agents_at(&settings.config_path, &settings.root_dir, &settings.home) {
            Ok(agents) => (agents, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };

    let agents = agents
        .into_iter()
        .map(|agent| {
            let template = match agent_template_dir(&settings.templates_dir, &agent.id) {
                Err(_) => TemplateStatus::Invalid,
                Ok(dir) if !dir.is_dir() => TemplateStatus::Missing,
                Ok(dir) => match is_empty_dir(&dir) {
                    Ok(false) => TemplateStatus::Ok,
                    _ => TemplateStatus::Empty,
                },
            };
            AgentCheck {
                workspace_exists: agent.workspace.is_dir(),
                inside_root: paths::is_descendant(&settings.root_dir, &agent.workspace),
                id: agent.id,
                workspace: agent.workspace,
                source: agent.source,
                template,
            }
        })
        .collect();

    DoctorReport {
        root_dir: settings.root_dir.clone(),
        config_path: settings.config_path.clone(),
        templates_dir: settings.templates_dir.clone(),
        config_error,
        templates_initialized,
        shared_includes,
        agents,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
