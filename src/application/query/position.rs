// SPDX-License-Identifier: MPL-2.0
//! Chronological position lookup in a track log.
//!
//! The match for a photo time `t` is the first timed point `p` such that
//! `prev < t <= p`, where `prev` is the last timed point seen before `p`.
//! The scan starts with `prev` set to the seed point, so a photo taken exactly
//! at the seed's time has nothing to bracket it and does not match.
//!
//! Tracks and segments are walked as one continuous sequence. Points without a
//! timestamp are invisible to the scan.

use crate::domain::track::{TrackPoint, TrackStore};
use chrono::{DateTime, Utc};

/// Finds the track point bracketing `photo_time`.
///
/// Returns `None` if the seed point has no time, if the photo predates or
/// equals the seed, or if it falls after the last timed point.
#[must_use]
pub fn match_position(store: &TrackStore, photo_time: DateTime<Utc>) -> Option<&TrackPoint> {
    let mut prev = store.seed().instant()?;

    for track in store.tracks() {
        for segment in &track.segments {
            for point in &segment.points {
                let Some(time) = point.instant() else {
                    continue;
                };
                if photo_time > prev && photo_time <= time {
                    return Some(point);
                }
                prev = time;
            }
        }
    }

    None
}
