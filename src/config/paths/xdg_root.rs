//! XDG Base Directory utilities for configuration lookup.

use crate::config::CONFIG_FILE_NAME;
use crate::error::ExtractError;
use std::path::PathBuf;

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
/// Follows XDG Base Directory Specification
pub fn config_home() -> Result<PathBuf, ExtractError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        ExtractError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Get the hfsubset config directory
///
/// Returns `$XDG_CONFIG_HOME/hfsubset/`. The directory is not created.
pub fn config_dir() -> Result<PathBuf, ExtractError> {
    Ok(config_home()?.join("hfsubset"))
}

/// Path of the global config file, whether or not it exists
pub fn config_file_path() -> Result<PathBuf, ExtractError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
