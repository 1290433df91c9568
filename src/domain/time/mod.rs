// SPDX-License-Identifier: MPL-2.0
//! Time reference types.
//!
//! - [`ZoneContext`]: session zone used to pin naive capture times
//! - [`resolve_zone`]: explicit spec, then track seed, then host fallback
//! - [`parse_exif_datetime`]: the fixed EXIF date/time pattern

mod zone;

pub use zone::{
    parse_exif_datetime, parse_zone, resolve_zone, Zone, ZoneContext, ZoneSource,
    EXIF_DATETIME_FORMAT,
};
