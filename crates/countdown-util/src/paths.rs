//! Default paths for the countdown service
//!
//! The configuration file is looked up, in order, at:
//! - `$COUNTDOWN_CONFIG`
//! - `$XDG_CONFIG_HOME/countdowns/config.toml`
//! - `~/.config/countdowns/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the configuration path
pub const COUNTDOWN_CONFIG_ENV: &str = "COUNTDOWN_CONFIG";

/// Configuration filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "countdowns";

/// Get the default configuration file path.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(COUNTDOWN_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking the COUNTDOWN_CONFIG env var.
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}
