// SPDX-License-Identifier: MPL-2.0
//! `gpx_geotag` assigns GPS positions to photos by matching their capture
//! times against a GPX track log.
//!
//! The crate follows a layered layout:
//!
//! - [`domain`]: track log tree, positions and session timezone resolution
//! - [`application`]: the position lookup, the per-photo workflow and the
//!   metadata ports it drives
//! - [`infrastructure`]: GPX parsing and EXIF adapters
//! - [`config`], [`logging`], [`error`]: ambient concerns

#![doc(html_root_url = "https://docs.rs/gpx_geotag/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_utils;
