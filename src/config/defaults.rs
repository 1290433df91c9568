// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for configuration.

/// Directory under the user config dir holding `settings.toml`.
pub const APP_NAME: &str = "GpxGeotag";

/// Settings file name.
pub const CONFIG_FILE: &str = "settings.toml";

/// Whether `GPSAltitude` is written alongside latitude and longitude.
pub const DEFAULT_WRITE_ELEVATION: bool = true;

/// Log level used when the settings file does not set one.
pub const DEFAULT_LOG_LEVEL: &str = crate::logging::DEFAULT_LOG_LEVEL;
