//! Live location tracking
//!
//! Bridges a platform location service into a normalized stream of player
//! positions. The platform capability is swappable at composition time via
//! the [`LocationSource`] trait - device GPS and browser geolocation
//! adapters live with their hosts; [`SimulatedLocationSource`] ships here
//! for tests and the CLI.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fairway::location::{LocationTracker, SimulatedLocationSource, TrackingPolicy};
//!
//! let (source, feed) = SimulatedLocationSource::channel();
//! let tracker = LocationTracker::new(Arc::new(source));
//! let mut positions = tracker.subscribe();
//!
//! let handle = tracker.start(TrackingPolicy::default())?;
//! feed.send_fix(36.5713, -121.9505);
//! // ... consume positions ...
//! handle.stop(); // idempotent; also runs on drop
//! ```

mod simulated;
mod source;
mod tracker;

pub use simulated::{SimulatedLocationSource, SimulatedSourceFeed};
pub use source::{
    AccuracyClass, LocationError, LocationSource, SourceEvent, SourceFix, TrackingPolicy,
    UnavailableReason,
};
pub use tracker::{LocationEvent, LocationTracker, PlayerPosition, TrackingHandle};
