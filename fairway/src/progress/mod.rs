//! Hole-progress engine
//!
//! Consumes player positions plus the current hole's course data, derives
//! live distance-to-pin and nearest-hazard distance, and decides when the
//! current hole is complete.
//!
//! Two layers, in the same split the library uses elsewhere:
//!
//! - [`HoleProgressEngine`] is a synchronous state machine: positions go in,
//!   [`ProgressEvent`]s come out. All round state lives here.
//! - [`RoundSession`] wires a [`crate::location::LocationTracker`] to an
//!   engine on a background task and re-broadcasts events to observers, with
//!   cancellation guarantees for stopped sessions.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fairway::location::SimulatedLocationSource;
//! use fairway::progress::{RoundSession, RoundSessionConfig, SessionEvent};
//!
//! let (source, feed) = SimulatedLocationSource::channel();
//! let session = RoundSession::start(
//!     Arc::new(source),
//!     Arc::new(course),
//!     RoundSessionConfig::default(),
//! )?;
//! let mut events = session.subscribe();
//! feed.send_fix(36.5713, -121.9505);
//! // ... react to SessionEvent::Progress(..) ...
//! session.stop();
//! ```

mod engine;
mod model;
mod session;

pub use engine::HoleProgressEngine;
pub use model::{
    DistanceReport, EngineError, EngineState, NearestHazard, ProgressEvent, TrackingSession,
    HOLE_COMPLETION_THRESHOLD_M,
};
pub use session::{RoundSession, RoundSessionConfig, SessionError, SessionEvent};
