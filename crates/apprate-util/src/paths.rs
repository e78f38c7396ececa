//! Default paths for apprate components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/apprate/config.toml` or `~/.config/apprate/config.toml`
//! - Data: `$XDG_DATA_HOME/apprate` or `~/.local/share/apprate`

use std::path::PathBuf;

/// Environment variable for overriding the data directory
pub const APPRATE_DATA_DIR_ENV: &str = "APPRATE_DATA_DIR";

/// Environment variable for overriding the config file path
pub const APPRATE_CONFIG_ENV: &str = "APPRATE_CONFIG";

/// Application subdirectory name
const APP_DIR: &str = "apprate";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Database filename within the data directory
pub const DB_FILENAME: &str = "apprate.db";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$APPRATE_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/apprate/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/apprate/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(APPRATE_CONFIG_ENV) {
        return PathBuf::from(path);
    }

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
/// 1. `$APPRATE_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/apprate` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/apprate` (fallback)
pub fn default_data_dir() -> PathBuf {
    // Check environment override first
    if let Ok(path) = std::env::var(APPRATE_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// XDG data directory, ignoring the override
fn data_dir_without_env() -> PathBuf {
    // Try XDG_DATA_HOME first
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    // Fallback to ~/.local/share/apprate
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
