//! Logging initialization

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_DIR: &str = "lift-tracker";
const LOG_FILE: &str = "lt-tui.log";

fn open_log_file() -> Option<(PathBuf, File)> {
    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_DIR);
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((path, file))
}

/// Logs go to a file so they never draw over the terminal UI.
/// Returns the log file path, or `None` if no file could be opened.
pub fn init_logging(debug: bool) -> Option<PathBuf> {
    let (path, file) = open_log_file()?;
    let default_level = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_ansi(false)
        .with_target(true)
        .init();

    Some(path)
}
