// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! This module contains concrete implementations of the port traits defined in
//! `application::port`, plus the track log parser.
//!
//! # Available Adapters
//!
//! - [`exif`]: Capture time reading via `kamadak-exif` (implements
//!   [`CaptureTimeReader`]) and GPS writing via `little_exif` (implements
//!   [`PositionWriter`])
//! - [`gpx`]: GPX track log parsing via `quick-xml`
//!
//! [`CaptureTimeReader`]: crate::application::port::CaptureTimeReader
//! [`PositionWriter`]: crate::application::port::PositionWriter

pub mod exif;
pub mod gpx;

// Re-export main types for convenience
pub use exif::{ExifReader, ExifWriter};
pub use gpx::{load_gpx, parse_gpx_str};
