// SPDX-License-Identifier: MPL-2.0
//! GPX track log parsing.
//!
//! Reads `<trk>` / `<trkseg>` / `<trkpt>` elements from GPX 1.0 and 1.1
//! documents into a [`TrackStore`]. Routes, waypoints and extensions are
//! ignored. Element names are compared by local name, so prefixed documents
//! (`<gpx:trkpt>`) parse the same way.

use crate::domain::track::{Segment, Track, TrackPoint, TrackStore, TrackTime};
use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use log::{info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Elevation used when a point has no `<ele>` child.
pub const DEFAULT_ELEVATION: f64 = 0.0;

/// Naive timestamp layout accepted when a `<time>` has no zone designator.
const NAIVE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Child element whose text is being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    TrackName,
    Elevation,
    Time,
}

/// Point under construction between `<trkpt>` and `</trkpt>`.
#[derive(Debug)]
struct PendingPoint {
    latitude: f64,
    longitude: f64,
    elevation: Option<f64>,
    time: Option<TrackTime>,
}

impl PendingPoint {
    fn finish(self) -> TrackPoint {
        TrackPoint {
            latitude: self.latitude,
            longitude: self.longitude,
            elevation: self.elevation.unwrap_or(DEFAULT_ELEVATION),
            time: self.time,
        }
    }
}

/// Loads and parses a GPX file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::TrackLog`] if it
/// is not valid GPX and [`Error::InvalidTrackStore`] if it has no seed point.
pub fn load_gpx<P: AsRef<Path>>(path: P) -> Result<TrackStore> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Io(format!("Failed to read track log '{}': {e}", path.display())))?;
    let store = parse_gpx_str(&content)?;

    info!(
        "loaded '{}': {} tracks, {} points",
        path.display(),
        store.tracks().len(),
        store.point_count()
    );
    if let Some((first, last)) = store.time_span() {
        info!("track covers {first} .. {last}");
    }
    Ok(store)
}

/// Parses a GPX document held in memory.
///
/// # Errors
///
/// Returns [`Error::TrackLog`] for malformed XML or unusable points and
/// [`Error::InvalidTrackStore`] if the document has no seed point.
pub fn parse_gpx_str(content: &str) -> Result<TrackStore> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    // Local names of currently open elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();

    let mut tracks: Vec<Track> = Vec::new();
    let mut track: Option<Track> = None;
    let mut segment: Option<Segment> = None;
    let mut point: Option<PendingPoint> = None;
    let mut target: Option<TextTarget> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::TrackLog(format!(
                "malformed GPX at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                let name = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(Vec::as_slice);
                match (name.as_slice(), parent) {
                    (b"trk", _) => track = Some(Track::default()),
                    (b"trkseg", _) if track.is_some() => segment = Some(Segment::default()),
                    (b"trkpt", _) if segment.is_some() => {
                        point = Some(start_point(e, reader.buffer_position() as u64)?);
                    }
                    (b"name", Some(b"trk")) => target = Some(TextTarget::TrackName),
                    (b"ele", Some(b"trkpt")) => target = Some(TextTarget::Elevation),
                    (b"time", Some(b"trkpt")) => target = Some(TextTarget::Time),
                    _ => {}
                }
                stack.push(name);
            }
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"trk" => tracks.push(Track::default()),
                b"trkseg" => {
                    if let Some(track) = track.as_mut() {
                        track.segments.push(Segment::default());
                    }
                }
                b"trkpt" => {
                    if let Some(segment) = segment.as_mut() {
                        let pending = start_point(e, reader.buffer_position() as u64)?;
                        segment.points.push(pending.finish());
                    }
                }
                _ => {}
            },
            Event::Text(ref e) => {
                if let Some(kind) = target {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::TrackLog(format!("bad text: {err}")))?;
                    apply_text(kind, text.trim(), track.as_mut(), point.as_mut());
                }
            }
            Event::CData(ref e) => {
                if let Some(kind) = target {
                    let text = String::from_utf8_lossy(&e.clone().into_inner()).into_owned();
                    apply_text(kind, text.trim(), track.as_mut(), point.as_mut());
                }
            }
            Event::End(ref e) => {
                stack.pop();
                match e.local_name().as_ref() {
                    b"name" | b"ele" | b"time" => target = None,
                    b"trkpt" => {
                        if let (Some(pending), Some(segment)) = (point.take(), segment.as_mut()) {
                            segment.points.push(pending.finish());
                        }
                    }
                    b"trkseg" => {
                        if let (Some(done), Some(track)) = (segment.take(), track.as_mut()) {
                            track.segments.push(done);
                        }
                    }
                    b"trk" => {
                        if let Some(done) = track.take() {
                            tracks.push(done);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    TrackStore::new(tracks)
}

/// Reads `lat` and `lon` from a `<trkpt>` start tag.
fn start_point(element: &BytesStart<'_>, position: u64) -> Result<PendingPoint> {
    let mut latitude = None;
    let mut longitude = None;

    for attr in element.attributes() {
        let attr =
            attr.map_err(|e| Error::TrackLog(format!("bad attribute at byte {position}: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| Error::TrackLog(format!("bad attribute at byte {position}: {e}")))?;
        match attr.key.local_name().as_ref() {
            b"lat" => latitude = value.trim().parse::<f64>().ok(),
            b"lon" => longitude = value.trim().parse::<f64>().ok(),
            _ => {}
        }
    }

    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Ok(PendingPoint {
            latitude,
            longitude,
            elevation: None,
            time: None,
        }),
        _ => Err(Error::TrackLog(format!(
            "track point at byte {position} has a missing or invalid lat/lon"
        ))),
    }
}

fn apply_text(
    kind: TextTarget,
    text: &str,
    track: Option<&mut Track>,
    point: Option<&mut PendingPoint>,
) {
    match kind {
        TextTarget::TrackName => {
            if let Some(track) = track {
                if !text.is_empty() {
                    track.name = Some(text.to_string());
                }
            }
        }
        TextTarget::Elevation => {
            if let Some(point) = point {
                point.elevation = text.parse::<f64>().ok();
                if point.elevation.is_none() {
                    warn!("ignoring unparseable elevation {text:?}");
                }
            }
        }
        TextTarget::Time => {
            if let Some(point) = point {
                point.time = parse_gpx_time(text);
                if point.time.is_none() {
                    warn!("ignoring unparseable track time {text:?}; point left untimed");
                }
            }
        }
    }
}

/// Parses a GPX `<time>` value.
///
/// RFC 3339 values keep their offset. Values without a zone designator are
/// kept naive.
#[must_use]
pub fn parse_gpx_time(text: &str) -> Option<TrackTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(TrackTime::Zoned(dt));
    }
    NaiveDateTime::parse_from_str(text, NAIVE_TIME_FORMAT)
        .ok()
        .map(TrackTime::Naive)
}
