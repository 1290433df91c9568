// SPDX-License-Identifier: MPL-2.0
//! Track log domain types.
//!
//! - [`TrackStore`]: validated track log with a guaranteed seed point
//! - [`Track`], [`Segment`], [`TrackPoint`]: the nested, ordered tree
//! - [`TrackTime`]: zoned or naive point timestamp

mod types;

pub use types::{Segment, Track, TrackPoint, TrackStore, TrackTime};
