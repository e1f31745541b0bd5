use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn,zbus=warn";

/// `<data dir>/teaser/teaser.log`.
pub fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("teaser").join("teaser.log"))
}

/// Send `tracing` output to the log file; the terminal belongs to the TUI.
///
/// `RUST_LOG` overrides the default filter. Without a data directory,
/// logging stays off.
pub fn init_logging() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(path) = log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    Ok(Some(path))
}
