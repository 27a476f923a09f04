//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/metro-sim/config.toml`
//! - macOS: `~/Library/Application Support/metro-sim/config.toml`
//! - Windows: `%APPDATA%\metro-sim\config.toml`

use std::path::PathBuf;

/// Application name used for directory paths.
const APP_NAME: &str = "metro-sim";

/// Configuration file name.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Ensure the user config directory exists.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_ends_with_app_and_file() {
        let path = default_config_path();
        assert!(path.ends_with("metro-sim/config.toml"));
    }
}
