//! Default on-disk locations.
//!
//! - [`data_dir`] - `<platform data dir>/kvprop/`
//! - [`default_store_path`] - `<platform data dir>/kvprop/defaults.redb`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// File name of the standard store database.
pub const STORE_FILE_NAME: &str = "defaults.redb";

/// Get the kvprop data directory.
///
/// Resolves to the platform data directory (`~/.local/share` on Linux,
/// `~/Library/Application Support` on macOS, `%APPDATA%` on Windows) joined
/// with `kvprop`.
pub fn data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("Failed to determine platform data directory")?;
    Ok(base.join("kvprop"))
}

/// Get the standard store path: `<data dir>/defaults.redb`
pub fn default_store_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(STORE_FILE_NAME))
}
