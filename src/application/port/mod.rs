// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters implement.
//! These traits use only domain types, ensuring the application layer remains
//! independent of concrete implementations.
//!
//! # Available Ports
//!
//! - [`metadata`]: Capture time reading and position writing (EXIF)
//!
//! # Design Notes
//!
//! - All traits use domain types only (no `exif` or `little_exif` types)
//! - Traits are `Send + Sync` for thread-safe usage
//! - Methods return `Result` with [`MetadataError`]

pub mod metadata;

// Re-export main types for convenience
pub use metadata::{CaptureTag, CaptureTimeReader, MetadataError, PositionWriter};
