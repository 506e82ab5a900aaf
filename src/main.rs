mod action;
mod app;
mod async_diff;
mod cli;
mod components;
mod config;
mod diff_rows;
mod event;
mod git;
mod gutter;
mod logging;
mod models;
mod selection;
mod state;
mod theme;
mod tui;

use anyhow::Result;
use clap::Parser;
use std::env;

use crate::app::App;
use crate::cli::{repo_pathspecs, Cli};
use crate::config::DEFAULT_CONTEXT_LINES;
use crate::git::RepoCache;
use crate::state::DiffOptions;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restore so the user gets their shell back
        let _ = tui::restore();
        tracing::error!(%panic_info, "panicked");
        default_hook(panic_info);
    }));
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().ok();
    install_panic_hook();

    let cli = Cli::parse();

    // Load config, apply CLI overrides
    let config = config::load_config(cli.theme.as_deref());
    let _log_guard = logging::init(config.log_level.as_deref())?;
    for warning in &config.warnings {
        tracing::warn!(%warning, "config");
    }

    let cwd = env::current_dir()?;

    // Validate we're in a git repo before launching TUI
    let repo = match RepoCache::open(&cwd) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), cwd = %cwd.display(), "no repository");
            eprintln!(
                "linepick: not a git repository (or any parent up to mount point /)\n\
                 Run this command from inside a git working tree."
            );
            std::process::exit(1);
        }
    };
    let repo_path = repo.workdir().to_path_buf();
    let branch_label = repo.branch_name().unwrap_or_else(|| "HEAD".to_string());
    drop(repo);

    // CLI wins over the config file
    let ignore_ws = cli.ignore_whitespace || config.ignore_whitespace.unwrap_or(false);
    let context_lines = cli
        .context_lines
        .or(config.context_lines)
        .unwrap_or(DEFAULT_CONTEXT_LINES);

    tracing::info!(
        repo = %repo_path.display(),
        branch = %branch_label,
        ignore_ws,
        context_lines,
        "starting"
    );

    // libgit2 may report the work tree through a resolved symlink
    let canonical = |p: &std::path::Path| p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
    let pathspecs = repo_pathspecs(&canonical(&cwd), &canonical(&repo_path), &cli.paths);
    let diff_options = DiffOptions::new(ignore_ws, context_lines, pathspecs);
    let mut app = App::new(diff_options, config.theme, repo_path, branch_label);

    let mut terminal = tui::init()?;
    let result = app.run(&mut terminal).await;
    tui::restore()?;

    if let Err(ref e) = result {
        tracing::error!(error = %format!("{e:#}"), "exited with error");
        eprintln!("linepick: {e:#}");
    }

    result
}
