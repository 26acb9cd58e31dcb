//! File logging for the terminal runtime.
//!
//! The TUI owns stdout and stderr, so records go to a file in the data
//! directory. `MOBDEX_LOG` takes an env_logger filter (default `info`).

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

pub const LOG_ENV: &str = "MOBDEX_LOG";
pub const LOG_FILE_NAME: &str = "mobdex.log";

pub fn init(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;

    log::info!("mobdex v{} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
