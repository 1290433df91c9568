// SPDX-License-Identifier: MPL-2.0
//! Photo metadata port definitions.
//!
//! The geotagging core needs exactly two things from a photo's metadata: its
//! original capture time, and a place to persist the matched position.
//! Infrastructure adapters implement these traits with `kamadak-exif` and
//! `little_exif`; tests implement them in memory.

use crate::domain::metadata::GeoPosition;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;

// =============================================================================
// MetadataError
// =============================================================================

/// Errors that can occur during metadata operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// Failed to read metadata from file.
    ReadFailed(String),

    /// Failed to write metadata to file.
    WriteFailed(String),

    /// The file format doesn't support metadata.
    UnsupportedFormat,

    /// A specific metadata field was not found.
    FieldNotFound(String),

    /// The file could not be accessed.
    IoError(String),
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::ReadFailed(msg) => write!(f, "Failed to read metadata: {msg}"),
            MetadataError::WriteFailed(msg) => write!(f, "Failed to write metadata: {msg}"),
            MetadataError::UnsupportedFormat => write!(f, "Format does not support metadata"),
            MetadataError::FieldNotFound(field) => write!(f, "Metadata field not found: {field}"),
            MetadataError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for MetadataError {}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::IoError(err.to_string())
    }
}

// =============================================================================
// CaptureTag
// =============================================================================

/// EXIF date/time fields read as capture time, in `YYYY:MM:DD HH:MM:SS` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureTag {
    /// When the shutter was released.
    DateTimeOriginal,
}

impl CaptureTag {
    /// Returns the EXIF tag name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            CaptureTag::DateTimeOriginal => "DateTimeOriginal",
        }
    }
}

impl fmt::Display for CaptureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// CaptureTimeReader Trait
// =============================================================================

/// Port for reading capture time information from photos.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so photos can be processed
/// concurrently.
///
/// # Example
///
/// ```ignore
/// use gpx_geotag::application::port::metadata::{CaptureTag, CaptureTimeReader};
/// use std::path::Path;
///
/// fn show_capture_time(reader: &impl CaptureTimeReader, path: &Path) {
///     if let Ok(Some(text)) = reader.read_tag(path, CaptureTag::DateTimeOriginal) {
///         println!("Taken: {text}");
///     }
/// }
/// ```
pub trait CaptureTimeReader: Send + Sync {
    /// Reads the raw text of a date/time tag.
    ///
    /// Returns `Ok(None)` when the photo has no such tag.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the metadata cannot be read.
    fn read_tag(&self, photo: &Path, tag: CaptureTag) -> Result<Option<String>, MetadataError>;

    /// Returns the photo file's creation time as an absolute instant.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the file system cannot provide it.
    fn file_created(&self, photo: &Path) -> Result<DateTime<Utc>, MetadataError>;
}

// =============================================================================
// PositionWriter Trait
// =============================================================================

/// Port for persisting a matched position onto a photo.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for concurrent writing.
pub trait PositionWriter: Send + Sync {
    /// Writes latitude, longitude and (when present) elevation, preserving
    /// the rest of the photo's metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if writing fails.
    fn write_position(&self, photo: &Path, position: &GeoPosition) -> Result<(), MetadataError>;
}
