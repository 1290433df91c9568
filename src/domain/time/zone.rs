// SPDX-License-Identifier: MPL-2.0
//! Session timezone resolution.
//!
//! Camera clocks record wall-clock time without a zone. Before a capture time
//! can be compared with a GPS track it must be pinned to an instant, using a
//! zone chosen once per run by [`resolve_zone`]:
//!
//! 1. an explicit user specification (fixed offset or IANA name),
//! 2. the offset recorded on the track's first timed point,
//! 3. the host's local zone when no point has a time at all.

use crate::domain::track::{TrackStore, TrackTime};
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Textual pattern of EXIF date/time fields.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

// =============================================================================
// Zone
// =============================================================================

/// Zone used to interpret naive photo timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Utc,
    Fixed(FixedOffset),
    Named(Tz),
    /// The host's local zone, looked up at localization time.
    Local,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Utc => write!(f, "UTC"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
            Zone::Local => write!(f, "local"),
        }
    }
}

/// Where the session zone came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSource {
    /// `--timezone` or the config file.
    Explicit,
    /// The seed point of the track log.
    Track,
    /// Host fallback.
    SystemLocal,
}

impl fmt::Display for ZoneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ZoneSource::Explicit => "explicit",
            ZoneSource::Track => "track",
            ZoneSource::SystemLocal => "system",
        };
        f.write_str(label)
    }
}

// =============================================================================
// ZoneContext
// =============================================================================

/// Resolved zone plus its provenance. Shared read-only across all photos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneContext {
    zone: Zone,
    source: ZoneSource,
}

impl ZoneContext {
    #[must_use]
    pub fn new(zone: Zone, source: ZoneSource) -> Self {
        Self { zone, source }
    }

    #[must_use]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    #[must_use]
    pub fn source(&self) -> ZoneSource {
        self.source
    }

    /// Pins a naive wall-clock time to an instant.
    ///
    /// Ambiguous times (clocks turned back) resolve to the earliest instant.
    /// Times skipped by a forward transition return `None`.
    #[must_use]
    pub fn localize(&self, naive: &NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.zone {
            Zone::Utc => Some(naive.and_utc()),
            Zone::Fixed(offset) => offset
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Named(tz) => tz
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            Zone::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

impl fmt::Display for ZoneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.zone, self.source)
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves the session zone.
///
/// # Errors
///
/// Returns [`Error::InvalidTimezone`] when `explicit` is neither a signed
/// offset nor a known zone name.
pub fn resolve_zone(explicit: Option<&str>, store: &TrackStore) -> Result<ZoneContext> {
    if let Some(spec) = explicit {
        return parse_zone(spec).map(|zone| ZoneContext::new(zone, ZoneSource::Explicit));
    }

    let first_timed = store.points().find_map(|point| point.time);
    let context = match first_timed {
        Some(TrackTime::Zoned(dt)) => ZoneContext::new(Zone::Fixed(*dt.offset()), ZoneSource::Track),
        // Naive track times are compared as UTC, so the track's own basis is UTC.
        Some(TrackTime::Naive(_)) => ZoneContext::new(Zone::Utc, ZoneSource::Track),
        None => ZoneContext::new(Zone::Local, ZoneSource::SystemLocal),
    };
    Ok(context)
}

/// Parses an explicit zone specification.
///
/// Signed offsets (`+02:00`, `-0530`, `+2`) become [`Zone::Fixed`] and `Z`
/// becomes [`Zone::Utc`]; anything else is looked up as an IANA zone name.
///
/// # Errors
///
/// Returns [`Error::InvalidTimezone`] if neither form parses.
pub fn parse_zone(spec: &str) -> Result<Zone> {
    let spec = spec.trim();
    if let Some(offset) = parse_offset(spec) {
        return Ok(Zone::Fixed(offset));
    }
    // RFC 3339 zone designator; chrono-tz has no zone by that name.
    if spec.eq_ignore_ascii_case("z") {
        return Ok(Zone::Utc);
    }
    spec.parse::<Tz>()
        .map(Zone::Named)
        .map_err(|_| Error::InvalidTimezone(spec.to_string()))
}

/// Parses a signed `HH:MM`-like offset.
///
/// Accepted: `+HH:MM`, `+HHMM`, `+HH`, `+H` and the `-` equivalents.
fn parse_offset(spec: &str) -> Option<FixedOffset> {
    let (sign, rest) = match spec.as_bytes().first()? {
        b'+' => (1, &spec[1..]),
        b'-' => (-1, &spec[1..]),
        _ => return None,
    };
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) if m.len() == 2 => (h, m),
        Some(_) => return None,
        None if rest.len() == 4 => rest.split_at(2),
        None if rest.len() <= 2 => (rest, "0"),
        None => return None,
    };
    if hours.is_empty() || hours.len() > 2 {
        return None;
    }

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Parses an EXIF date/time (`YYYY:MM:DD HH:MM:SS`).
///
/// Quotes, surrounding whitespace and trailing NULs left by some writers are
/// tolerated.
#[must_use]
pub fn parse_exif_datetime(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text
        .trim_end_matches('\0')
        .trim()
        .trim_matches('"')
        .trim();
    NaiveDateTime::parse_from_str(cleaned, EXIF_DATETIME_FORMAT).ok()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::track::{Segment, Track, TrackPoint};

    fn store_with_seed(time: Option<TrackTime>) -> TrackStore {
        let seed = TrackPoint {
            latitude: 1.0,
            longitude: 1.0,
            elevation: 0.0,
            time,
        };
        TrackStore::new(vec![Track::new(vec![Segment::new(vec![seed])])]).unwrap()
    }

    fn naive(text: &str) -> NaiveDateTime {
        parse_exif_datetime(text).expect("valid EXIF datetime")
    }

    #[test]
    fn explicit_offset_localizes_to_utc() {
        let store = store_with_seed(None);
        let ctx = resolve_zone(Some("+02:00"), &store).unwrap();
        assert_eq!(ctx.source(), ZoneSource::Explicit);

        let instant = ctx.localize(&naive("2024:06:01 10:00:00")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn explicit_named_zone_resolves() {
        let store = store_with_seed(None);
        let ctx = resolve_zone(Some("Europe/Paris"), &store).unwrap();
        assert_eq!(ctx.zone(), Zone::Named(chrono_tz::Europe::Paris));

        // CEST in June.
        let instant = ctx.localize(&naive("2024:06:01 10:00:00")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn explicit_spec_wins_over_track_zone() {
        let seed = DateTime::parse_from_rfc3339("2024-06-01T10:00:00+05:00").unwrap();
        let store = store_with_seed(Some(TrackTime::Zoned(seed)));
        let ctx = resolve_zone(Some("-03:00"), &store).unwrap();
        assert_eq!(ctx.zone(), Zone::Fixed(FixedOffset::west_opt(3 * 3600).unwrap()));
    }

    #[test]
    fn invalid_explicit_spec_is_rejected() {
        let store = store_with_seed(None);
        for spec in ["Mars/Olympus", "+25:00", "+02:7", "0200", "", "+", "+1:2:3"] {
            let err = resolve_zone(Some(spec), &store).unwrap_err();
            assert!(
                matches!(err, Error::InvalidTimezone(_)),
                "expected InvalidTimezone for {spec:?}"
            );
        }
    }

    #[test]
    fn offset_forms_are_accepted() {
        let cases = [
            ("+02:00", 7200),
            ("-05:30", -19800),
            ("+0530", 19800),
            ("-02", -7200),
            ("+2", 7200),
            ("+00:00", 0),
        ];
        for (spec, secs) in cases {
            assert_eq!(
                parse_zone(spec).unwrap(),
                Zone::Fixed(FixedOffset::east_opt(secs).unwrap()),
                "spec {spec:?}"
            );
        }
    }

    #[test]
    fn zulu_designator_is_utc() {
        assert_eq!(parse_zone("Z").unwrap(), Zone::Utc);
        assert_eq!(parse_zone(" z ").unwrap(), Zone::Utc);
        assert_eq!(parse_zone("UTC").unwrap(), Zone::Named(chrono_tz::UTC));
        assert_eq!(
            parse_zone("Etc/GMT-2").unwrap(),
            Zone::Named(chrono_tz::Etc::GMTMinus2)
        );
    }

    #[test]
    fn missing_spec_uses_seed_offset() {
        let seed = DateTime::parse_from_rfc3339("2024-06-01T10:00:00+02:00").unwrap();
        let store = store_with_seed(Some(TrackTime::Zoned(seed)));
        let ctx = resolve_zone(None, &store).unwrap();
        assert_eq!(ctx.source(), ZoneSource::Track);
        assert_eq!(ctx.zone(), Zone::Fixed(FixedOffset::east_opt(7200).unwrap()));
    }

    #[test]
    fn missing_spec_with_naive_seed_uses_utc() {
        let store = store_with_seed(Some(TrackTime::Naive(naive("2024:06:01 10:00:00"))));
        let ctx = resolve_zone(None, &store).unwrap();
        assert_eq!(ctx.zone(), Zone::Utc);
        assert_eq!(ctx.source(), ZoneSource::Track);
    }

    #[test]
    fn missing_spec_skips_untimed_seed() {
        let later = DateTime::parse_from_rfc3339("2024-06-01T10:00:00-04:00").unwrap();
        let tracks = vec![Track::new(vec![Segment::new(vec![
            TrackPoint::untimed(1.0, 1.0, 0.0),
            TrackPoint::new(2.0, 2.0, 0.0, TrackTime::Zoned(later)),
        ])])];
        let store = TrackStore::new(tracks).unwrap();

        let ctx = resolve_zone(None, &store).unwrap();
        assert_eq!(ctx.source(), ZoneSource::Track);
        assert_eq!(ctx.zone(), Zone::Fixed(FixedOffset::west_opt(4 * 3600).unwrap()));
    }

    #[test]
    fn missing_spec_with_untimed_seed_falls_back_to_local() {
        let store = store_with_seed(None);
        let ctx = resolve_zone(None, &store).unwrap();
        assert_eq!(ctx.zone(), Zone::Local);
        assert_eq!(ctx.source(), ZoneSource::SystemLocal);
    }

    #[test]
    fn ambiguous_local_time_takes_earliest_instant() {
        let ctx = ZoneContext::new(Zone::Named(chrono_tz::Europe::Paris), ZoneSource::Explicit);
        // 2024-10-27 02:30 happens twice in Paris.
        let instant = ctx.localize(&naive("2024:10:27 02:30:00")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-10-27T00:30:00+00:00");
    }

    #[test]
    fn skipped_local_time_does_not_localize() {
        let ctx = ZoneContext::new(Zone::Named(chrono_tz::Europe::Paris), ZoneSource::Explicit);
        // 2024-03-31 02:30 does not exist in Paris.
        assert!(ctx.localize(&naive("2024:03:31 02:30:00")).is_none());
    }

    #[test]
    fn parse_exif_datetime_accepts_fixed_pattern_only() {
        assert!(parse_exif_datetime("2024:06:01 10:00:00").is_some());
        assert!(parse_exif_datetime("\"2024:06:01 10:00:00\"").is_some());
        assert!(parse_exif_datetime("2024:06:01 10:00:00\0").is_some());
        assert!(parse_exif_datetime("2024-06-01 10:00:00").is_none());
        assert!(parse_exif_datetime("0000:00:00 00:00:00").is_none());
        assert!(parse_exif_datetime("").is_none());
    }

    #[test]
    fn zone_context_display_names_source() {
        let ctx = ZoneContext::new(Zone::Utc, ZoneSource::Track);
        assert_eq!(ctx.to_string(), "UTC (track)");
    }
}
