// SPDX-License-Identifier: MPL-2.0
use crate::application::port::metadata::MetadataError;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    /// The GPX document could not be parsed into tracks.
    TrackLog(String),
    /// The parsed track log violates the construction invariants.
    InvalidTrackStore(String),
    /// An explicit timezone is neither a signed offset nor a known zone name.
    InvalidTimezone(String),
    /// Per-photo metadata failure.
    Metadata(MetadataError),
}

impl Error {
    /// Returns true for errors that invalidate the whole run rather than a
    /// single photo.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Metadata(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::TrackLog(e) => write!(f, "Track Log Error: {}", e),
            Error::InvalidTrackStore(e) => write!(f, "Invalid Track Store: {}", e),
            Error::InvalidTimezone(e) => write!(f, "Invalid Timezone: {}", e),
            Error::Metadata(e) => write!(f, "Metadata Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<MetadataError> for Error {
    fn from(err: MetadataError) -> Self {
        Error::Metadata(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
