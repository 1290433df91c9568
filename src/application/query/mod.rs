// SPDX-License-Identifier: MPL-2.0
//! Query services (read-side).
//!
//! These services do not modify state; they provide read-only access to the
//! track log.
//!
//! # Available Services
//!
//! - [`position`]: Chronological position lookup (`match_position`)

pub mod position;

// Re-export main types
pub use position::match_position;
