//! `agentmd pull-agents` — add template directories for newly configured agents.

use anyhow::{Context, Result};
use clap::Args;

use agentmd_core::Settings;
use agentmd_sync::pipeline;

#[derive(Args, Debug)]
pub struct PullAgentsArgs {}

impl PullAgentsArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let report = pipeline::run_pull_agents(settings).context("pull-agents failed")?;

        if report.agents.is_empty() {
            println!("✓ Every configured agent already has a template directory.");
            return Ok(());
        }
        println!("✓ Added {} agent template(s)", report.agents.len());
        for agent in &report.agents {
            println!("  +  {}", report.template_root.join(agent.as_str()).display());
        }
        Ok(())
    }
}
