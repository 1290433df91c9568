// SPDX-License-Identifier: MPL-2.0
//! Per-photo geotagging workflow.
//!
//! For each photo: read the capture time (falling back to the file creation
//! time), pin it to an instant with the session [`ZoneContext`], look up the
//! bracketing track point and, if there is one, hand its position to the
//! [`PositionWriter`].
//!
//! A [`Geotagger`] borrows the track log and owns nothing mutable, so photos
//! are independent units of work. [`Geotagger::geotag_all`] keeps going when a
//! photo fails and records the failure in the [`BatchReport`].

use crate::application::port::metadata::{
    CaptureTag, CaptureTimeReader, MetadataError, PositionWriter,
};
use crate::application::query::match_position;
use crate::domain::time::{parse_exif_datetime, ZoneContext};
use crate::domain::track::{TrackPoint, TrackStore};
use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

// =============================================================================
// PhotoTimestamp
// =============================================================================

/// Where a photo's capture instant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    /// `DateTimeOriginal`, localized with the session zone.
    Metadata,
    /// File creation time, already absolute.
    FileCreated,
}

/// Capture instant of a photo. Computed fresh for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoTimestamp {
    pub instant: DateTime<Utc>,
    pub source: CaptureSource,
}

impl PhotoTimestamp {
    #[must_use]
    pub fn new(instant: DateTime<Utc>, source: CaptureSource) -> Self {
        Self { instant, source }
    }
}

impl fmt::Display for PhotoTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.instant.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

// =============================================================================
// MatchResult
// =============================================================================

/// What happened to the metadata write for a photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Matched, but the run is a dry run.
    Skipped,
    /// No match, so nothing to write.
    NotAttempted,
    Failed(MetadataError),
}

/// Outcome of matching one photo against the track log.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub photo: PathBuf,
    pub timestamp: PhotoTimestamp,
    pub point: Option<TrackPoint>,
    pub write: WriteOutcome,
}

impl MatchResult {
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.point.is_some()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.point {
            Some(point) => write!(
                f,
                "{}: position {} at {}",
                self.photo.display(),
                point.position(),
                self.timestamp
            ),
            None => write!(
                f,
                "{}: position unavailable at {}",
                self.photo.display(),
                self.timestamp
            ),
        }
    }
}

// =============================================================================
// BatchReport
// =============================================================================

/// Result of processing one photo in a batch.
#[derive(Debug, Clone)]
pub enum PhotoOutcome {
    Done(MatchResult),
    Failed { photo: PathBuf, error: Error },
}

/// Outcomes of a whole batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<PhotoOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn matched(&self) -> usize {
        self.results().filter(|r| r.is_matched()).count()
    }

    #[must_use]
    pub fn unmatched(&self) -> usize {
        self.results().filter(|r| !r.is_matched()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PhotoOutcome::Failed { .. }))
            .count()
    }

    /// Number of matched photos whose write failed.
    #[must_use]
    pub fn write_failures(&self) -> usize {
        self.results()
            .filter(|r| matches!(r.write, WriteOutcome::Failed(_)))
            .count()
    }

    /// Successfully processed photos.
    pub fn results(&self) -> impl Iterator<Item = &MatchResult> {
        self.outcomes.iter().filter_map(|o| match o {
            PhotoOutcome::Done(result) => Some(result),
            PhotoOutcome::Failed { .. } => None,
        })
    }
}

// =============================================================================
// Geotagger
// =============================================================================

/// Switches for the write-back step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeotagOptions {
    /// Match and report without touching any file.
    pub dry_run: bool,
    /// Write `GPSAltitude` alongside latitude and longitude.
    pub write_elevation: bool,
}

impl Default for GeotagOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            write_elevation: true,
        }
    }
}

/// Matches photos against a track log and writes their positions.
pub struct Geotagger<'a, R, W> {
    store: &'a TrackStore,
    zone: ZoneContext,
    reader: R,
    writer: W,
    options: GeotagOptions,
}

impl<'a, R, W> Geotagger<'a, R, W>
where
    R: CaptureTimeReader,
    W: PositionWriter,
{
    #[must_use]
    pub fn new(store: &'a TrackStore, zone: ZoneContext, reader: R, writer: W) -> Self {
        Self {
            store,
            zone,
            reader,
            writer,
            options: GeotagOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GeotagOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn zone(&self) -> ZoneContext {
        self.zone
    }

    #[must_use]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Determines the capture instant of a photo.
    ///
    /// A missing or unparseable `DateTimeOriginal` is not an error: the file
    /// creation time is used instead, without applying the session zone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metadata`] when neither source is available.
    pub fn capture_time(&self, photo: &Path) -> Result<PhotoTimestamp> {
        match self.metadata_time(photo) {
            Ok(instant) => return Ok(PhotoTimestamp::new(instant, CaptureSource::Metadata)),
            Err(reason) => debug!(
                "capture time of '{}' unavailable ({reason}); using file creation time",
                photo.display()
            ),
        }

        let instant = self.reader.file_created(photo)?;
        Ok(PhotoTimestamp::new(instant, CaptureSource::FileCreated))
    }

    fn metadata_time(&self, photo: &Path) -> std::result::Result<DateTime<Utc>, MetadataError> {
        let tag = CaptureTag::DateTimeOriginal;
        let text = self
            .reader
            .read_tag(photo, tag)?
            .ok_or_else(|| MetadataError::FieldNotFound(tag.name().to_string()))?;
        let naive = parse_exif_datetime(&text)
            .ok_or_else(|| MetadataError::ReadFailed(format!("unparseable {tag}: {text:?}")))?;
        self.zone.localize(&naive).ok_or_else(|| {
            MetadataError::ReadFailed(format!("{naive} does not exist in {}", self.zone.zone()))
        })
    }

    /// Matches one photo and writes its position when a match is found.
    ///
    /// # Errors
    ///
    /// Returns an error only when no capture time can be determined. Write
    /// failures are reported through [`MatchResult::write`].
    pub fn geotag_photo(&self, photo: &Path) -> Result<MatchResult> {
        let timestamp = self.capture_time(photo)?;
        let point = match_position(self.store, timestamp.instant).cloned();

        let write = match &point {
            None => WriteOutcome::NotAttempted,
            Some(_) if self.options.dry_run => WriteOutcome::Skipped,
            Some(point) => {
                let mut position = point.position();
                if !self.options.write_elevation {
                    position = position.without_elevation();
                }
                match self.writer.write_position(photo, &position) {
                    Ok(()) => WriteOutcome::Written,
                    Err(e) => {
                        warn!("failed to write position to '{}': {e}", photo.display());
                        WriteOutcome::Failed(e)
                    }
                }
            }
        };

        Ok(MatchResult {
            photo: photo.to_path_buf(),
            timestamp,
            point,
            write,
        })
    }

    /// Processes every photo in order. One photo's failure never stops the
    /// batch.
    pub fn geotag_all<I, P>(&self, photos: I) -> BatchReport
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut report = BatchReport::default();
        for photo in photos {
            let photo = photo.as_ref();
            let outcome = match self.geotag_photo(photo) {
                Ok(result) => PhotoOutcome::Done(result),
                Err(error) => {
                    warn!("skipping '{}': {error}", photo.display());
                    PhotoOutcome::Failed {
                        photo: photo.to_path_buf(),
                        error,
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        info!(
            "batch finished: {} matched, {} unmatched, {} failed, {} write failures",
            report.matched(),
            report.unmatched(),
            report.failed(),
            report.write_failures()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metadata::GeoPosition;
    use crate::domain::time::{Zone, ZoneSource};
    use crate::domain::track::{Segment, Track, TrackTime};
    use chrono::{FixedOffset, TimeZone};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeReader {
        tags: HashMap<PathBuf, String>,
        created: HashMap<PathBuf, DateTime<Utc>>,
    }

    impl CaptureTimeReader for FakeReader {
        fn read_tag(
            &self,
            photo: &Path,
            _tag: CaptureTag,
        ) -> std::result::Result<Option<String>, MetadataError> {
            Ok(self.tags.get(photo).cloned())
        }

        fn file_created(&self, photo: &Path) -> std::result::Result<DateTime<Utc>, MetadataError> {
            self.created
                .get(photo)
                .copied()
                .ok_or_else(|| MetadataError::IoError("no such file".into()))
        }
    }

    #[derive(Default)]
    struct FakeWriter {
        written: Mutex<Vec<(PathBuf, GeoPosition)>>,
    }

    impl PositionWriter for FakeWriter {
        fn write_position(
            &self,
            photo: &Path,
            position: &GeoPosition,
        ) -> std::result::Result<(), MetadataError> {
            self.written
                .lock()
                .unwrap()
                .push((photo.to_path_buf(), *position));
            Ok(())
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, 0).unwrap()
    }

    fn track() -> TrackStore {
        let point = |lat: f64, t: DateTime<Utc>| {
            TrackPoint::new(lat, lat, 100.0 + lat, TrackTime::Zoned(t.fixed_offset()))
        };
        TrackStore::new(vec![Track::new(vec![Segment::new(vec![
            point(1.0, at(10, 0)),
            point(2.0, at(10, 5)),
        ])])])
        .unwrap()
    }

    fn plus_two() -> ZoneContext {
        ZoneContext::new(
            Zone::Fixed(FixedOffset::east_opt(7200).unwrap()),
            ZoneSource::Explicit,
        )
    }

    #[test]
    fn metadata_time_is_localized_with_session_zone() {
        let store = track();
        let mut reader = FakeReader::default();
        reader
            .tags
            .insert("a.jpg".into(), "2024:06:01 10:00:00".into());
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let ts = tagger.capture_time(Path::new("a.jpg")).unwrap();
        assert_eq!(ts.source, CaptureSource::Metadata);
        assert_eq!(ts.to_string(), "2024-06-01T08:00:00Z");
    }

    #[test]
    fn missing_tag_falls_back_to_creation_time_without_zone() {
        let store = track();
        let mut reader = FakeReader::default();
        reader.created.insert("b.jpg".into(), at(10, 3));
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let ts = tagger.capture_time(Path::new("b.jpg")).unwrap();
        assert_eq!(ts.source, CaptureSource::FileCreated);
        assert_eq!(ts.instant, at(10, 3));
    }

    #[test]
    fn unparseable_tag_falls_back_to_creation_time() {
        let store = track();
        let mut reader = FakeReader::default();
        reader.tags.insert("c.jpg".into(), "yesterday".into());
        reader.created.insert("c.jpg".into(), at(10, 4));
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let ts = tagger.capture_time(Path::new("c.jpg")).unwrap();
        assert_eq!(ts.source, CaptureSource::FileCreated);
    }

    #[test]
    fn no_capture_time_at_all_is_an_error() {
        let store = track();
        let tagger = Geotagger::new(&store, plus_two(), FakeReader::default(), FakeWriter::default());
        let err = tagger.geotag_photo(Path::new("ghost.jpg")).unwrap_err();
        assert!(matches!(err, Error::Metadata(MetadataError::IoError(_))));
    }

    #[test]
    fn matched_photo_is_written_and_reported() {
        let store = track();
        let mut reader = FakeReader::default();
        reader
            .tags
            .insert("a.jpg".into(), "2024:06:01 12:03:00".into());
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let result = tagger.geotag_photo(Path::new("a.jpg")).unwrap();
        assert_eq!(result.write, WriteOutcome::Written);
        assert_eq!(
            result.to_string(),
            "a.jpg: position 2.000000, 2.000000, 102.0 at 2024-06-01T10:03:00Z"
        );

        let written = tagger.writer().written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].1, GeoPosition::new(2.0, 2.0, 102.0));
    }

    #[test]
    fn unmatched_photo_is_not_written() {
        let store = track();
        let mut reader = FakeReader::default();
        reader
            .tags
            .insert("late.jpg".into(), "2024:06:01 12:06:00".into());
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let result = tagger.geotag_photo(Path::new("late.jpg")).unwrap();
        assert_eq!(result.write, WriteOutcome::NotAttempted);
        assert_eq!(
            result.to_string(),
            "late.jpg: position unavailable at 2024-06-01T10:06:00Z"
        );
        assert!(tagger.writer().written.lock().unwrap().is_empty());
    }

    #[test]
    fn dry_run_skips_write() {
        let store = track();
        let mut reader = FakeReader::default();
        reader.created.insert("a.jpg".into(), at(10, 1));
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default())
            .with_options(GeotagOptions {
                dry_run: true,
                write_elevation: true,
            });

        let result = tagger.geotag_photo(Path::new("a.jpg")).unwrap();
        assert!(result.is_matched());
        assert_eq!(result.write, WriteOutcome::Skipped);
        assert!(tagger.writer().written.lock().unwrap().is_empty());
    }

    #[test]
    fn elevation_can_be_left_out() {
        let store = track();
        let mut reader = FakeReader::default();
        reader.created.insert("a.jpg".into(), at(10, 1));
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default())
            .with_options(GeotagOptions {
                dry_run: false,
                write_elevation: false,
            });

        tagger.geotag_photo(Path::new("a.jpg")).unwrap();
        let written = tagger.writer().written.lock().unwrap();
        assert_eq!(written[0].1.elevation(), None);
    }

    #[test]
    fn batch_continues_after_failed_photo() {
        let store = track();
        let mut reader = FakeReader::default();
        reader.created.insert("first.jpg".into(), at(10, 2));
        reader.created.insert("third.jpg".into(), at(11, 0));
        let tagger = Geotagger::new(&store, plus_two(), reader, FakeWriter::default());

        let report = tagger.geotag_all(["first.jpg", "missing.jpg", "third.jpg"]);
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.matched(), 1);
        assert_eq!(report.unmatched(), 1);
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            &report.outcomes[1],
            PhotoOutcome::Failed { photo, .. } if photo == Path::new("missing.jpg")
        ));
    }
}
