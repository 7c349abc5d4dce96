//! Logging setup: console output plus an optional per-run log file.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "m2tsforge=trace,m2tsforge_av=trace"
    } else {
        "m2tsforge=info,m2tsforge_av=info"
    }
}

/// Log file name for a run started at `started`.
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("m2tsforge {}.log", started.format("%Y-%m-%d %H-%M-%S"))
}

/// Directory receiving the log file: the input itself when it is a
/// directory, otherwise the input file's directory.
pub fn log_dir_for(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Install the global subscriber.
///
/// When `log_dir` is given, events are also written without ANSI colors to a
/// timestamped file in that directory, whose path is returned.
pub fn init(verbose: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| default_filter(verbose).to_string());

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            let path = dir.join(log_file_name(Local::now()));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file: {:?}", path))?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(fmt::layer())
        .with(file_layer)
        .init();

    Ok(log_path)
}
