// SPDX-License-Identifier: MPL-2.0
//! Metadata domain types.
//!
//! - [`GeoPosition`]: latitude, longitude and elevation written onto a photo

mod types;

pub use types::GeoPosition;
