// SPDX-License-Identifier: MPL-2.0
//! EXIF adapters for the metadata ports.
//!
//! - [`ExifReader`] reads date/time tags with `kamadak-exif`, which understands
//!   JPEG, TIFF, PNG, WebP and HEIF containers.
//! - [`ExifWriter`] writes GPS tags with `little_exif`, preserving every other
//!   tag already in the file.

use crate::application::port::metadata::{
    CaptureTag, CaptureTimeReader, MetadataError, PositionWriter,
};
use crate::domain::metadata::GeoPosition;
use chrono::{DateTime, Utc};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use log::debug;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Hundredths of an arc-second per degree.
const CENTI_ARCSEC_PER_DEGREE: u64 = 360_000;

/// `GPSVersionID` 2.3.0.0.
const GPS_VERSION: [u8; 4] = [2, 3, 0, 0];

// =============================================================================
// ExifReader
// =============================================================================

/// Reads capture times from EXIF and creation times from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl CaptureTimeReader for ExifReader {
    fn read_tag(&self, photo: &Path, tag: CaptureTag) -> Result<Option<String>, MetadataError> {
        let file = File::open(photo)?;
        let mut reader = BufReader::new(file);

        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => return Ok(None),
            Err(e) => {
                return Err(MetadataError::ReadFailed(format!(
                    "'{}': {e}",
                    photo.display()
                )))
            }
        };

        Ok(exif
            .get_field(exif_tag(tag), exif::In::PRIMARY)
            .and_then(|field| ascii_value(&field.value)))
    }

    fn file_created(&self, photo: &Path) -> Result<DateTime<Utc>, MetadataError> {
        let metadata = fs::metadata(photo)?;
        let time = match metadata.created() {
            Ok(time) => time,
            Err(e) => {
                // Some file systems do not record a birth time.
                debug!(
                    "no creation time for '{}' ({e}); using modification time",
                    photo.display()
                );
                metadata.modified()?
            }
        };
        Ok(DateTime::<Utc>::from(time))
    }
}

fn exif_tag(tag: CaptureTag) -> exif::Tag {
    match tag {
        CaptureTag::DateTimeOriginal => exif::Tag::DateTimeOriginal,
    }
}

/// First string of an ASCII field.
fn ascii_value(value: &exif::Value) -> Option<String> {
    match value {
        exif::Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

// =============================================================================
// ExifWriter
// =============================================================================

/// Writes GPS position tags into existing EXIF metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifWriter;

impl PositionWriter for ExifWriter {
    fn write_position(&self, photo: &Path, position: &GeoPosition) -> Result<(), MetadataError> {
        if !is_format_supported(photo) {
            return Err(MetadataError::UnsupportedFormat);
        }
        if !position.is_valid() {
            return Err(MetadataError::WriteFailed(format!(
                "refusing to write non-finite position {position}"
            )));
        }

        // little_exif cannot reliably write into a file that has no EXIF block yet.
        if !has_exif(photo)? {
            return Err(MetadataError::WriteFailed(format!(
                "'{}' has no EXIF block to add GPS tags to",
                photo.display()
            )));
        }
        let mut metadata = Metadata::new_from_path(photo).map_err(|e| {
            MetadataError::WriteFailed(format!(
                "could not read existing EXIF from '{}': {e:?}",
                photo.display()
            ))
        })?;

        set_gps_position(&mut metadata, position);

        metadata.write_to_file(photo).map_err(|e| {
            MetadataError::WriteFailed(format!(
                "could not write EXIF to '{}': {e:?}",
                photo.display()
            ))
        })
    }
}

/// Checks for an existing EXIF block with the reader's parser.
fn has_exif(photo: &Path) -> Result<bool, MetadataError> {
    let mut reader = BufReader::new(File::open(photo)?);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(_) => Ok(true),
        Err(exif::Error::NotFound(_)) => Ok(false),
        Err(e) => Err(MetadataError::WriteFailed(format!(
            "unreadable EXIF in '{}': {e}",
            photo.display()
        ))),
    }
}

/// Sets GPS coordinates and, when present, altitude.
fn set_gps_position(metadata: &mut Metadata, position: &GeoPosition) {
    metadata.set_tag(ExifTag::GPSVersionID(GPS_VERSION.to_vec()));
    metadata.set_tag(ExifTag::GPSLatitudeRef(position.latitude_ref().to_string()));
    metadata.set_tag(ExifTag::GPSLatitude(decimal_to_dms(position.latitude())));
    metadata.set_tag(ExifTag::GPSLongitudeRef(position.longitude_ref().to_string()));
    metadata.set_tag(ExifTag::GPSLongitude(decimal_to_dms(position.longitude())));

    if let Some(elevation) = position.elevation() {
        // 0 = above sea level, 1 = below.
        let below_sea_level = u8::from(elevation < 0.0);
        metadata.set_tag(ExifTag::GPSAltitudeRef(vec![below_sea_level]));
        metadata.set_tag(ExifTag::GPSAltitude(vec![altitude_rational(elevation)]));
    }
}

/// Converts decimal degrees to DMS rationals, seconds to 1/100.
///
/// The sign is dropped; the hemisphere goes in the `*Ref` tag.
fn decimal_to_dms(decimal: f64) -> Vec<uR64> {
    let total = (decimal.abs() * CENTI_ARCSEC_PER_DEGREE as f64).round() as u64;
    let degrees = total / CENTI_ARCSEC_PER_DEGREE;
    let minutes = (total % CENTI_ARCSEC_PER_DEGREE) / 6_000;
    let centi_seconds = total % 6_000;

    vec![
        uR64 {
            nominator: degrees as u32,
            denominator: 1,
        },
        uR64 {
            nominator: minutes as u32,
            denominator: 1,
        },
        uR64 {
            nominator: centi_seconds as u32,
            denominator: 100,
        },
    ]
}

/// Absolute altitude in centimeters as an EXIF rational.
fn altitude_rational(elevation: f64) -> uR64 {
    uR64 {
        nominator: (elevation.abs() * 100.0).round() as u32,
        denominator: 100,
    }
}

/// Returns the list of file extensions that support EXIF writing.
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "webp", "tiff", "tif", "heic", "heif", "jxl"]
}

/// Checks if a file format supports EXIF writing.
pub fn is_format_supported<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| supported_extensions().contains(&ext.to_lowercase().as_str()))
}
