// SPDX-License-Identifier: MPL-2.0
//! Track log domain types.
//!
//! A track log is an owned, read-only tree: tracks contain segments, segments
//! contain points. It is built once by a parser and never mutated afterwards.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::fmt;

// =============================================================================
// TrackTime
// =============================================================================

/// Timestamp recorded on a track point.
///
/// GPX writers normally emit UTC times with a `Z` suffix, but some devices
/// write local wall-clock times with no zone designator at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTime {
    /// Time with an explicit offset (including `Z`).
    Zoned(DateTime<FixedOffset>),
    /// Time without zone information, compared as UTC.
    Naive(NaiveDateTime),
}

impl TrackTime {
    /// Returns the absolute instant used for chronological comparison.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            TrackTime::Zoned(dt) => dt.with_timezone(&Utc),
            TrackTime::Naive(naive) => naive.and_utc(),
        }
    }

    /// Returns the recorded offset, if the time carried one.
    #[must_use]
    pub fn offset(&self) -> Option<FixedOffset> {
        match self {
            TrackTime::Zoned(dt) => Some(*dt.offset()),
            TrackTime::Naive(_) => None,
        }
    }
}

impl fmt::Display for TrackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackTime::Zoned(dt) => write!(f, "{}", dt.to_rfc3339()),
            TrackTime::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

// =============================================================================
// TrackPoint
// =============================================================================

/// One sample of a GPS trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation in meters above sea level.
    pub elevation: f64,
    /// Capture time; points without one cannot be matched.
    pub time: Option<TrackTime>,
}

impl TrackPoint {
    /// Creates a timed point.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, elevation: f64, time: TrackTime) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            time: Some(time),
        }
    }

    /// Creates a point without a timestamp.
    #[must_use]
    pub fn untimed(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
            time: None,
        }
    }

    /// Absolute instant of this point, if timed.
    #[must_use]
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.time.map(|t| t.instant())
    }

    /// Position of this point as a [`GeoPosition`](crate::domain::metadata::GeoPosition).
    #[must_use]
    pub fn position(&self) -> crate::domain::metadata::GeoPosition {
        crate::domain::metadata::GeoPosition::new(self.latitude, self.longitude, self.elevation)
    }
}

// =============================================================================
// Segment / Track
// =============================================================================

/// Ordered run of points recorded without interruption.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<TrackPoint>,
}

impl Segment {
    #[must_use]
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }
}

/// Ordered sequence of segments, optionally named.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: Option<String>,
    pub segments: Vec<Segment>,
}

impl Track {
    #[must_use]
    pub fn new(segments: Vec<Segment>) -> Self {
        Self {
            name: None,
            segments,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

// =============================================================================
// TrackStore
// =============================================================================

/// Validated, immutable track log.
///
/// # Invariants
///
/// - At least one track.
/// - The first track has at least one segment.
/// - That segment has at least one point (the seed point).
///
/// Chronological order inside segments is assumed, not checked.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackStore {
    tracks: Vec<Track>,
}

impl TrackStore {
    /// Builds a store from parsed tracks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTrackStore`] if there is no seed point.
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let first_track = tracks
            .first()
            .ok_or_else(|| Error::InvalidTrackStore("track log contains no tracks".into()))?;
        let first_segment = first_track.segments.first().ok_or_else(|| {
            Error::InvalidTrackStore("first track contains no segments".into())
        })?;
        if first_segment.points.is_empty() {
            return Err(Error::InvalidTrackStore(
                "first segment of first track contains no points".into(),
            ));
        }
        Ok(Self { tracks })
    }

    /// All tracks in stored order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The first point of the first segment of the first track.
    #[must_use]
    pub fn seed(&self) -> &TrackPoint {
        // Guaranteed by `new`.
        &self.tracks[0].segments[0].points[0]
    }

    /// Every point of every segment of every track, in stored order.
    pub fn points(&self) -> impl Iterator<Item = &TrackPoint> {
        self.tracks
            .iter()
            .flat_map(|track| track.segments.iter())
            .flat_map(|segment| segment.points.iter())
    }

    /// Total number of points, timed or not.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    /// First and last timed instants, in stored order.
    #[must_use]
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut timed = self.points().filter_map(TrackPoint::instant);
        let first = timed.next()?;
        let last = timed.last().unwrap_or(first);
        Some((first, last))
    }
}

// =============================================================================
// Tests
// =============================================================================
