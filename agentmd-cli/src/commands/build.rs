//! `agentmd build` — render templates into agent workspaces.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use agentmd_core::Settings;
use agentmd_sync::{
    engine::AgentBuild,
    pipeline::{self, BuildRequest},
    BuildOptions, BuildOutcome, FileAction, SkipReason,
};

/// Arguments for `agentmd build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Agent id or workspace path to build (omit to build every agent).
    pub selector: Option<String>,

    /// Replace existing workspace files that are not generated from includes.
    #[arg(long)]
    pub overwrite: bool,

    /// Delete everything in the workspace except `.git` before building.
    #[arg(long)]
    pub wipe: bool,

    /// Allow a workspace path selector outside the root directory.
    #[arg(long)]
    pub force: bool,
}

impl BuildArgs {
    pub fn run(self, settings: &Settings, cwd: &Path) -> Result<()> {
        let request = BuildRequest {
            selector: self.selector.clone(),
            options: BuildOptions {
                overwrite: self.overwrite,
                wipe: self.wipe,
            },
            allow_outside: self.force,
        };
        let outcome = pipeline::run_build(settings, cwd, &request).with_context(|| {
            match &self.selector {
                Some(selector) => format!("build failed for '{selector}'"),
                None => "build failed".to_string(),
            }
        })?;

        print_outcome(&outcome);
        Ok(())
    }
}

fn print_outcome(outcome: &BuildOutcome) {
    for agent in &outcome.agents {
        print_agent(agent);
    }
    println!(
        "✓ Built {} agent(s): {} written, {} skipped",
        outcome.agents_processed(),
        outcome.files_written,
        outcome.files_skipped
    );
}

fn print_agent(agent: &AgentBuild) {
    println!("'{}' → {}", agent.agent_id, agent.workspace.display());
    for path in &agent.removed {
        println!("  ✗  {}", path.display());
    }
    for file in &agent.files {
        let marker = match file.action {
            FileAction::Compiled => "⚙",
            FileAction::Copied => "+",
            FileAction::Overwritten => "✎",
            FileAction::Skipped(SkipReason::Exists) => "·",
            FileAction::Skipped(SkipReason::GitMetadata) => "⊘",
        };
        println!("  {marker}  {}", file.relative_path.display());
    }
}
