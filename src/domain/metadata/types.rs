// SPDX-License-Identifier: MPL-2.0
//! Metadata domain types.

use std::fmt;

// =============================================================================
// GeoPosition
// =============================================================================

/// Position written onto a photo: WGS84 decimal degrees plus elevation.
///
/// # Example
///
/// ```ignore
/// let pos = GeoPosition::new(48.8566, 2.3522, 35.0); // Paris
/// assert_eq!(pos.to_string(), "48.856600, 2.352200, 35.0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPosition {
    /// Latitude in decimal degrees (-90.0 to 90.0)
    latitude: f64,
    /// Longitude in decimal degrees (-180.0 to 180.0)
    longitude: f64,
    /// Elevation in meters; `None` when it should not be written
    elevation: Option<f64>,
}

impl GeoPosition {
    /// Creates a new position.
    ///
    /// Values outside valid ranges will be clamped:
    /// - Latitude: -90.0 to 90.0
    /// - Longitude: -180.0 to 180.0
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
            elevation: Some(elevation),
        }
    }

    /// Returns the same position with the elevation dropped.
    #[must_use]
    pub fn without_elevation(self) -> Self {
        Self {
            elevation: None,
            ..self
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[must_use]
    pub fn elevation(&self) -> Option<f64> {
        self.elevation
    }

    /// Returns whether every component is finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.elevation.is_none_or(f64::is_finite)
    }

    /// Latitude hemisphere reference as written to EXIF.
    #[must_use]
    pub fn latitude_ref(&self) -> &'static str {
        if self.latitude >= 0.0 {
            "N"
        } else {
            "S"
        }
    }

    /// Longitude hemisphere reference as written to EXIF.
    #[must_use]
    pub fn longitude_ref(&self) -> &'static str {
        if self.longitude >= 0.0 {
            "E"
        } else {
            "W"
        }
    }
}

impl fmt::Display for GeoPosition {
    /// Format: "48.856600, 2.352200, 35.0" (elevation omitted when absent)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)?;
        if let Some(elevation) = self.elevation {
            write!(f, ", {elevation:.1}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
