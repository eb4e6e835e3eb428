//! Filesystem helpers

use std::path::{Path, PathBuf};

use crate::{error::Result, DB_PATH_ENV_VAR};

/// Path: ~/.local/share/rugby-predictor/predictions.db (or platform equivalent)
pub fn default_database_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".local");
        home.push("share");
        home
    });
    base.join("rugby-predictor").join("predictions.db")
}

/// Explicit path, then `RUGBY_PREDICTOR_DB`, then the default location
pub fn database_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DB_PATH_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(default_database_path)
}

/// Read an uploaded catalog file as UTF-8 text
pub fn read_upload(path: &Path) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}
