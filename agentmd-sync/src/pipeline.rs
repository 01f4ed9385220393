//! Shared entrypoints used by the CLI: load the registry, then act on it.

use std::path::Path;

use agentmd_core::{config, AgentEntry, Settings};

use crate::engine::{self, BuildOptions, BuildOutcome};
use crate::scaffold::{self, ScaffoldReport};
use crate::select::{self, SelectOptions};
use crate::SyncError;

/// One `agentmd build` invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// Workspace path or agent id; `None` builds every agent.
    pub selector: Option<String>,
    pub options: BuildOptions,
    /// Allow path selectors that resolve outside the root directory.
    pub allow_outside: bool,
}

fn load(settings: &Settings) -> Result<Vec<AgentEntry>, SyncError> {
    Ok(config::load_agents_at(
        &settings.config_path,
        &settings.root_dir,
        &settings.home,
    )?)
}

/// Load → select → build.
pub fn run_build(
    settings: &Settings,
    cwd: &Path,
    request: &BuildRequest,
) -> Result<BuildOutcome, SyncError> {
    let agents = load(settings)?;
    let select_options = SelectOptions {
        sanctioned_root: settings.root_dir.clone(),
        allow_outside: request.allow_outside,
        cwd: cwd.to_path_buf(),
        home: settings.home.clone(),
    };
    let selected = select::select(&agents, request.selector.as_deref(), &select_options)?;
    if request.options.wipe {
        for agent in &selected {
            engine::check_workspace_clear_of(agent, &settings.config_path)?;
        }
    }
    engine::build(&settings.templates_dir, &selected, request.options)
}

/// Load → scaffold the full template tree.
pub fn run_init(settings: &Settings, force: bool) -> Result<ScaffoldReport, SyncError> {
    let agents = load(settings)?;
    scaffold::init(&settings.templates_dir, &agents, force)
}

/// Load → add template directories for new agents.
pub fn run_pull_agents(settings: &Settings) -> Result<ScaffoldReport, SyncError> {
    let agents = load(settings)?;
    scaffold::pull_agents(&settings.templates_dir, &agents)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use agentmd_core::SettingsOverrides;
    use tempfile::TempDir;

    use super::*;

    fn settings_for(root: &Path) -> Settings {
        let overrides = SettingsOverrides {
            root: Some(root.to_path_buf()),
            templates: None,
        };
        Settings::resolve(overrides, |_| None, root, root)
    }

    #[test]
    fn build_without_config_is_a_config_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = run_build(&settings_for(tmp.path()), tmp.path(), &BuildRequest::default())
            .expect_err("no config");
        assert!(matches!(err, SyncError::Config(_)), "got: {err}");
    }

    #[test]
    fn init_then_build_selected_agent() {
        let tmp = TempDir::new().expect("tmp");
        let settings = settings_for(tmp.path());
        fs::write(
            &settings.config_path,
            r#"{ "agents": { "list": [
                { "id": "main" },
                { "id": "alpha", "workspace": "workspace-alpha" }
            ] } }"#,
        )
        .expect("config");

        run_init(&settings, false).expect("init");
        let request = BuildRequest {
            selector: Some("alpha".to_string()),
            ..BuildRequest::default()
        };
        let outcome = run_build(&settings, tmp.path(), &request).expect("build");

        assert_eq!(outcome.agents_processed(), 1);
        assert!(tmp.path().join("workspace-alpha/AGENTS.md").is_file());
        assert!(!tmp.path().join("workspace").exists());
    }

    #[test]
    fn wipe_refuses_workspace_holding_the_config() {
        let tmp = TempDir::new().expect("tmp");
        let root = tmp.path().join("state");
        let settings = Settings::resolve(
            SettingsOverrides {
                root: Some(root.clone()),
                templates: Some(tmp.path().join("templates")),
            },
            |_| None,
            tmp.path(),
            tmp.path(),
        );
        fs::create_dir_all(&root).expect("root");
        fs::write(
            &settings.config_path,
            r#"{ "agents": { "defaults": { "workspace": "." }, "list": [{ "id": "main" }] } }"#,
        )
        .expect("config");
        run_init(&settings, false).expect("init");

        let request = BuildRequest {
            options: BuildOptions {
                overwrite: false,
                wipe: true,
            },
            ..BuildRequest::default()
        };
        let err = run_build(&settings, tmp.path(), &request).expect_err("wipe into root");
        assert!(matches!(err, SyncError::WorkspaceContainsInput { .. }), "got: {err}");
        assert!(settings.config_path.is_file());

        let outcome = run_build(&settings, tmp.path(), &BuildRequest::default())
            .expect("plain build still allowed");
        assert!(root.join("AGENTS.md").is_file());
        assert_eq!(outcome.agents_processed(), 1);
    }
}
