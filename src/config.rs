use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "healthlog";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "HEALTHLOG_DATA_DIR";

/// Blob key under which the merged store is persisted.
pub const STORE_KEY: &str = "health-data";

/// Uploads above this size are rejected before extraction.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024; // 100MB

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine a data directory; set {DATA_DIR_ENV} or pass --data-dir")]
    NoDataDir,
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "healthlog=info,warn"
}

/// Platform data directory for healthlog, ignoring any override.
/// ~/.local/share/healthlog on Linux, ~/Library/Application Support/healthlog on macOS
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(APP_NAME))
}

/// Resolve the data directory: explicit override, then `HEALTHLOG_DATA_DIR`,
/// then the platform default.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    default_data_dir().ok_or(ConfigError::NoDataDir)
}

/// Default destination for exports under a resolved data directory.
pub fn exports_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("exports")
}
