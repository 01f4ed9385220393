//! `agentmd init [--force]`

use anyhow::{Context, Result};
use clap::Args;

use agentmd_core::Settings;
use agentmd_sync::pipeline;

/// Create the template tree from the embedded skeleton.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite skeleton files even if the template root already has content.
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let report = pipeline::run_init(settings, self.force).with_context(|| {
            format!(
                "failed to initialize templates at '{}'",
                settings.templates_dir.display()
            )
        })?;

        println!(
            "✓ Initialized templates for {} agent(s) at {}",
            report.agents.len(),
            report.template_root.display()
        );
        for agent in &report.agents {
            println!("  +  {agent}/");
        }
        println!("  {} files written", report.written.len());
        Ok(())
    }
}
