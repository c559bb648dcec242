use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `debug` or `medichat=trace`.
pub const LOG_ENV: &str = "MEDICHAT_LOG";
const DEFAULT_FILTER: &str = "info";

/// Send all `tracing` output to `log_path`. Stdout stays free for the TUI.
pub fn init(log_path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = log_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;
    tracing::info!("logging initialized: {}", path.display());
    Ok(path.to_path_buf())
}
