//! Canonical file paths for the data directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PCAF_DATA_DIR";

/// File name of the results database inside the data directory.
pub const RESULTS_DB_FILE: &str = "results.duckdb";

/// Returns the data directory: `$PCAF_DATA_DIR`, or `./data`.
#[must_use]
pub fn data_dir() -> PathBuf {
    std::env::var(DATA_DIR_ENV).map_or_else(|_| PathBuf::from("data"), PathBuf::from)
}

/// Returns the results database path inside `data_dir`.
#[must_use]
pub fn results_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(RESULTS_DB_FILE)
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
