// SPDX-License-Identifier: MPL-2.0
//! Process logging bootstrap.
//!
//! The library logs through the `log` facade. The command-line front end calls
//! [`init_logging`] once to route records to stderr through `flexi_logger`, so
//! they never mix with the per-photo report on stdout.

use crate::error::{Error, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::debug;

/// Level used when neither the config file nor `--verbose` says otherwise.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Level selected by `--verbose`.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

/// Starts the stderr logger.
///
/// The returned handle must be kept alive for the duration of the run.
///
/// # Errors
///
/// Returns [`Error::Config`] when `level` is unsupported or the logger
/// backend cannot start (for example when a logger is already installed).
pub fn init_logging(level: &str) -> Result<LoggerHandle> {
    let level = normalize_level(level)?;
    let handle = Logger::try_with_str(level)
        .map_err(|e| Error::Config(format!("invalid log level `{level}`: {e}")))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|e| Error::Config(format!("failed to start logger: {e}")))?;

    debug!("logging started at level {level}");
    Ok(handle)
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(Error::Config(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("INFO").unwrap(), "info");
        assert_eq!(normalize_level(" warning ").unwrap(), "warn");
        assert_eq!(normalize_level("off").unwrap(), "off");
    }

    #[test]
    fn normalize_level_rejects_unknown_values() {
        let err = normalize_level("chatty").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("chatty")));
    }

    #[test]
    fn init_logging_rejects_bad_level_before_starting() {
        assert!(init_logging("loud").is_err());
    }
}
