//! Fairway - on-course GPS round tracking for golf.
//!
//! This library provides the core functionality behind a golf companion's
//! on-course screen: geodesic distance/bearing math, course data validation,
//! live player-position tracking, and a hole-progress engine that reports
//! distances and advances the round as the player holes out.

pub mod clubs;
pub mod course;
pub mod geo;
pub mod location;
pub mod progress;

/// Crate version, for banners and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
