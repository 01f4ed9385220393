//! `agentmd doctor` — read-only health check.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use agentmd_core::Settings;
use agentmd_sync::doctor::{self, AgentCheck, DoctorReport, TemplateStatus};

/// Arguments for `agentmd doctor`.
#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DoctorArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let report = doctor::diagnose(settings);
        let problems = report.problems();

        if self.json {
            print_json(&report, &problems)?;
        } else {
            print_report(&report, &problems);
        }

        if !problems.is_empty() {
            bail!("doctor found {} problem(s)", problems.len());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct DoctorJson<'a> {
    report: &'a DoctorReport,
    problems: &'a [String],
}

fn print_json(report: &DoctorReport, problems: &[String]) -> Result<()> {
    let payload = DoctorJson { report, problems };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize doctor JSON")?
    );
    Ok(())
}

#[derive(Tabled)]
struct AgentRow {
    #[tabled(rename = "agent")]
    id: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "workspace")]
    workspace: String,
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "exists")]
    exists: String,
}

impl AgentRow {
    fn from_check(check: &AgentCheck) -> Self {
        let mut workspace = check.workspace.display().to_string();
        if !check.inside_root {
            workspace.push_str(" (outside root)");
        }
        Self {
            id: check.id.to_string(),
            template: template_marker(check.template),
            workspace,
            source: check.source.to_string(),
            exists: if check.workspace_exists { "yes" } else { "no" }.to_string(),
        }
    }
}

fn template_marker(status: TemplateStatus) -> String {
    match status {
        TemplateStatus::Ok => "ok".green().bold().to_string(),
        TemplateStatus::Empty => "empty".yellow().bold().to_string(),
        TemplateStatus::Missing => "missing".red().bold().to_string(),
        TemplateStatus::Invalid => "invalid".red().bold().to_string(),
    }
}

fn print_report(report: &DoctorReport, problems: &[String]) {
    println!("root       {}", report.root_dir.display());
    println!("config     {}", report.config_path.display());
    println!("templates  {}", report.templates_dir.display());
    println!();

    if report.agents.is_empty() {
        println!("No agents loaded.");
    } else {
        let rows: Vec<AgentRow> = report.agents.iter().map(AgentRow::from_check).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if problems.is_empty() {
        println!("{} no problems found", "✓".green().bold());
        return;
    }
    println!();
    for problem in problems {
        println!("{} {problem}", "✗".red().bold());
    }
}
