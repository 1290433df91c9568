// SPDX-License-Identifier: MPL-2.0
//! Test utilities shared by unit tests.
//!
//! Coordinates and elevations are `f64`; compare them with the `approx`
//! macro re-exported here instead of `assert_eq!`.

pub use approx::assert_abs_diff_eq;

/// Tolerance for coordinates that went through a text round trip.
pub const COORDINATE_EPSILON: f64 = 1e-9;
