//! agentmd — scaffold and build per-agent workspace templates.
//!
//! # Usage
//!
//! ```text
//! agentmd [--root <DIR>] [--templates <DIR>] init [--force]
//! agentmd pull-agents
//! agentmd doctor [--json]
//! agentmd build [SELECTOR] [--overwrite] [--wipe] [--force]
//! ```
//!
//! `--root` falls back to `$AGENTMD_ROOT`, then `~/.agentmd`.
//! `--templates` falls back to `$AGENTMD_TEMPLATES`, then `<root>/templates`.
//! Log verbosity comes from `$AGENTMD_LOG` (default `warn`).

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use agentmd_core::{Settings, SettingsOverrides};
use commands::{build::BuildArgs, doctor::DoctorArgs, init::InitArgs, pull_agents::PullAgentsArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "agentmd",
    version,
    about = "Scaffold and build markdown templates into agent workspaces",
    long_about = None,
)]
struct Cli {
    /// Config root directory (holds agentmd.json). Overrides $AGENTMD_ROOT.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Template root directory. Overrides $AGENTMD_TEMPLATES.
    #[arg(long, global = true, value_name = "DIR")]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the template tree: shared includes plus one directory per agent.
    Init(InitArgs),

    /// Add template directories for agents that appeared in the config.
    PullAgents(PullAgentsArgs),

    /// Check config, template tree, and workspaces without changing anything.
    Doctor(DoctorArgs),

    /// Render templates into agent workspaces.
    Build(BuildArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cwd = std::env::current_dir().context("could not determine current directory")?;
    let settings = Settings::from_env(
        SettingsOverrides {
            root: cli.root,
            templates: cli.templates,
        },
        &cwd,
    )
    .context("could not resolve agentmd directories")?;
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Commands::Init(args) => args.run(&settings),
        Commands::PullAgents(args) => args.run(&settings),
        Commands::Doctor(args) => args.run(&settings),
        Commands::Build(args) => args.run(&settings, &cwd),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("AGENTMD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
