use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::dirs_home;

const DEFAULT_FILTER: &str = "linepick=info";

fn log_dir() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".local");
    path.push("state");
    path.push("linepick");
    path
}

/// Send `tracing` output to `~/.local/state/linepick/linepick.log`.
///
/// The terminal belongs to the TUI, so nothing is ever written to stderr.
/// `RUST_LOG` wins over `config_filter`. Keep the returned guard alive for
/// the life of the process or buffered lines are lost.
pub fn init(config_filter: Option<&str>) -> Result<WorkerGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let mut opts = OpenOptions::new();
    opts.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let file = opts
        .open(dir.join("linepick.log"))
        .context("Failed to open log file")?;

    let (writer, guard) = non_blocking(file);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(file_layer).try_init();

    Ok(guard)
}
