//! Default paths for countdown
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/countdown/config.toml` or `~/.config/countdown/config.toml`
//! - Data: `$XDG_DATA_HOME/countdown` or `~/.local/share/countdown`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const COUNTDOWN_CONFIG_ENV: &str = "COUNTDOWN_CONFIG";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "countdown";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/countdown/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/countdown/config.toml` (fallback)
///
/// `COUNTDOWN_CONFIG` is handled by the CLI layer.
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/tmp").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$XDG_DATA_HOME/countdown` (if XDG_DATA_HOME is set)
/// 2. `~/.local/share/countdown` (fallback)
///
/// `COUNTDOWN_DATA_DIR` is handled by the CLI layer.
pub fn default_data_dir() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
