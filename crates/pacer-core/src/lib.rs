//! `pacer-core` — foundational types for the `pacer` walk engine.
//!
//! This crate is a dependency of every other `pacer-*` crate.  It has no
//! `pacer-*` dependencies and few external ones (`rand`, `thiserror`,
//! `serde`, `toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `Coordinate`, distance, bearing, projection           |
//! | [`config`]      | `WalkSettings`, `SpeedVariantConfig`                  |
//! | [`rng`]         | `WalkRng`                                             |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{MAX_REPORT_INTERVAL_SECS, SpeedVariantConfig, WalkSettings};
pub use error::{CoreError, CoreResult};
pub use geo::{Coordinate, EARTH_RADIUS_M, normalize_bearing};
pub use rng::WalkRng;
