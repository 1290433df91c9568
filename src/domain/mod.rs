// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core value types and rules.
//!
//! This module contains pure domain types, value objects, and business rules.
//! Its only external dependencies are `chrono` and `chrono-tz`, which provide
//! the time values every other layer exchanges.
//!
//! # Modules
//!
//! - [`metadata`]: Metadata types ([`GeoPosition`](metadata::GeoPosition))
//! - [`time`]: Session zone resolution ([`ZoneContext`](time::ZoneContext))
//! - [`track`]: Track log tree ([`TrackStore`](track::TrackStore),
//!   [`TrackPoint`](track::TrackPoint))

pub mod metadata;
pub mod time;
pub mod track;
