// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//! - [`query`]: Read-only lookups over the track log
//! - [`geotag`]: The per-photo geotagging workflow
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The command-line front end wires infrastructure into [`geotag::Geotagger`]
//!
//! # Example
//!
//! ```ignore
//! use gpx_geotag::application::geotag::Geotagger;
//! use gpx_geotag::domain::time::resolve_zone;
//! use gpx_geotag::infrastructure::{gpx, ExifReader, ExifWriter};
//!
//! let store = gpx::load_gpx("walk.gpx")?;
//! let zone = resolve_zone(None, &store)?;
//! let tagger = Geotagger::new(&store, zone, ExifReader, ExifWriter);
//! let report = tagger.geotag_all(["IMG_0001.jpg", "IMG_0002.jpg"]);
//! ```

pub mod geotag;
pub mod port;
pub mod query;
