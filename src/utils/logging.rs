use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use super::app_paths::AppPaths;

/// Environment variable that overrides the log filter, e.g.
/// `DATA_CLI_LOG=debug` or `DATA_CLI_LOG=data_cli::repl=trace`.
pub const LOG_ENV_VAR: &str = "DATA_CLI_LOG";

/// Sends tracing output to a file under the data directory, leaving the
/// terminal to the REPL. Returns the log file path.
pub fn init_logging() -> Result<PathBuf> {
    let log_path = AppPaths::log_file()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("could not open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so a second call (as in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .compact()
        .try_init();

    Ok(log_path)
}
