//! # gitdeck
//!
//! An interactive terminal dashboard that surveys a projects root
//! directory and reports the git state of every repository beneath it:
//! branch, uncommitted work, unpushed/unpulled commits, and when the
//! last commit landed.
//!
//! ## Overview
//!
//! gitdeck answers "where did I leave things?" from a single screen.
//! Repositories are probed concurrently with a bounded worker pool and
//! per-query timeouts, so one wedged repository never stalls the
//! dashboard. Press enter on any row for a per-project detail view.
//!
//! ## Example
//!
//! ```text
//! gitdeck ~/code            # interactive dashboard
//! gitdeck ~/code --once     # scan, print, exit
//! gitdeck --once --json     # machine-readable scan results
//! ```

mod app;
mod banner;
mod config;
mod probe;
mod project;
mod scanner;
mod screens;
mod theme;

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use config::AppConfig;
use project::{Project, StatusKind};

#[derive(Parser)]
#[command(name = "gitdeck")]
#[command(version, about = "Terminal dashboard for the git state of all your projects", long_about = None)]
struct Cli {
    #[arg(help = "Projects root to survey (overrides the configured root)")]
    path: Option<PathBuf>,

    #[arg(long, value_name = "PATH", help = "Path to a config file")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Color theme name")]
    theme: Option<String>,

    #[arg(long, help = "Scan once, print results, and exit (no dashboard)")]
    once: bool,

    #[arg(long, requires = "once", help = "Output scan results as JSON")]
    json: bool,

    #[arg(long, help = "Draw on the main screen instead of the alternate buffer")]
    no_alt_screen: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.path {
        config.projects_root = path;
    }
    if let Some(theme) = cli.theme {
        config.theme.name = theme;
    }
    if cli.no_alt_screen {
        config.alt_screen = false;
    }

    let config = config.resolved();
    config.validate()?;

    if cli.once {
        return run_once(&config, cli.json);
    }
    app::run(config)
}

/// Non-interactive mode: one scan, printed to stdout.
fn run_once(config: &AppConfig, json: bool) -> Result<()> {
    let outcome = scanner::scan(config)?;
    let mut projects = outcome.projects;
    projects.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("{}", "No projects found.".yellow());
        return Ok(());
    }

    for project in &projects {
        display_project(project);
    }
    if outcome.probe_failures > 0 {
        println!(
            "{}",
            format!("{} probe failure(s); see the log for details", outcome.probe_failures)
                .yellow()
        );
    }
    Ok(())
}

/// One line per project, mirroring the dashboard row.
fn display_project(project: &Project) {
    let git = &project.git;

    let status = match git.status {
        StatusKind::Clean => "clean".green().bold(),
        StatusKind::Dirty => "dirty".yellow().bold(),
        StatusKind::Ahead => "ahead".cyan().bold(),
        StatusKind::Behind => "behind".cyan().bold(),
        StatusKind::Diverged => "diverged".red().bold(),
        StatusKind::NoRemote => "no remote".bright_black().bold(),
    };

    print!("{}", project.name.bright_white().bold());
    if !git.branch.is_empty() {
        print!(" {}", format!("[{}]", git.branch).bright_blue());
    }
    print!(" [{}]", status);
    if git.uncommitted > 0 {
        print!(" {}", format!("±{}", git.uncommitted).yellow());
    }
    if git.unpushed > 0 {
        print!(" {}", format!("↑{}", git.unpushed).cyan());
    }
    if git.unpulled > 0 {
        print!(" {}", format!("↓{}", git.unpulled).cyan());
    }
    if !git.last_commit_message.is_empty() {
        print!(
            " {}",
            format!("\"{}\"", screens::truncate_subject(&git.last_commit_message, 30))
                .bright_black()
        );
    }
    if let Some(time) = git.last_commit_time {
        print!(
            " {}",
            screens::format_age(chrono::Utc::now().signed_duration_since(time)).bright_black()
        );
    }
    println!();
}
