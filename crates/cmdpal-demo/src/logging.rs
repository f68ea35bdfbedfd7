#![forbid(unsafe_code)]

//! Log setup. The terminal belongs to the UI, so logs only ever go to a
//! file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use cmdpal_core::logging::LOG_FILTER_ENV;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber writing to `path`, appending.
///
/// Does nothing without a path. The filter comes from `CMDPAL_LOG`
/// (default `info`).
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(path: Option<&Path>, json: bool) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = open(path)?;

    let installed = if json {
        cmdpal_core::logging::init_json(Mutex::new(file))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_target(true)
            .with_writer(Mutex::new(file))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::info!(path = %path.display(), json, "logging initialized");
    }
    Ok(())
}

fn open(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}
