// SPDX-License-Identifier: MPL-2.0
//! This module handles the tool's configuration, loaded from a `settings.toml`
//! file in the user's config directory or from an explicit path.
//!
//! # Examples
//!
//! ```no_run
//! use gpx_geotag::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.timezone = Some("Europe/Paris".to_string());
//!
//! // Save to a specific path
//! let path = PathBuf::from("./settings.toml");
//! config::save_to_path(&config, &path).expect("Failed to save config");
//! let loaded = config::load_from_path(&path).expect("Failed to load config");
//! assert_eq!(loaded.timezone.as_deref(), Some("Europe/Paris"));
//! ```

pub mod defaults;

use crate::error::Result;
use defaults::{APP_NAME, CONFIG_FILE, DEFAULT_LOG_LEVEL, DEFAULT_WRITE_ELEVATION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default zone for naive capture times; `--timezone` overrides it.
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub write_elevation: Option<bool>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: None,
            write_elevation: Some(DEFAULT_WRITE_ELEVATION),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    #[must_use]
    pub fn write_elevation(&self) -> bool {
        self.write_elevation.unwrap_or(DEFAULT_WRITE_ELEVATION)
    }

    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Path of the settings file in the user's config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Loads settings from `path`. Unparseable content falls back to defaults.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!("ignoring invalid settings in '{}': {e}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip_preserves_settings() {
        let config = Config {
            timezone: Some("+02:00".to_string()),
            write_elevation: Some(false),
            log_level: Some("debug".to_string()),
        };
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &config_path).expect("failed to save config");
        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_returns_default_on_invalid_toml() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn missing_keys_use_accessor_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "timezone = \"Europe/Paris\"\n").expect("failed to write toml");

        let loaded = load_from_path(&config_path).expect("load should not error");
        assert_eq!(loaded.timezone.as_deref(), Some("Europe/Paris"));
        assert!(loaded.write_elevation());
        assert_eq!(loaded.log_level(), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn load_from_missing_path_is_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let err = load_from_path(&temp_dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn default_config_enables_elevation() {
        let config = Config::default();
        assert!(config.write_elevation());
        assert!(config.timezone.is_none());
    }
}
