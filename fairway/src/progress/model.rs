//! Round-progress state and events.

use std::fmt;

use thiserror::Error;

use crate::course::Hazard;
use crate::location::PlayerPosition;

/// Distance from the pin, in meters, at which a hole counts as holed out.
///
/// Policy constant carried over from the companion app. The completion check
/// is strictly `distance < threshold`; a player exactly on the threshold has
/// not finished the hole.
pub const HOLE_COMPLETION_THRESHOLD_M: f64 = 10.0;

/// Hole-progress engine states.
///
/// `Idle -> Tracking(h) -> HoleComplete(h) -> Tracking(h+1) -> ... ->
/// RoundComplete`. The `HoleComplete -> Tracking` transition is host-driven
/// via `advance_hole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No round in progress.
    Idle,
    /// Live-tracking the given hole.
    Tracking { hole: u32 },
    /// The given hole is finished; waiting for the host to advance.
    HoleComplete { hole: u32 },
    /// Every hole on the course is finished.
    RoundComplete,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Tracking { hole } => write!(f, "tracking hole {}", hole),
            EngineState::HoleComplete { hole } => write!(f, "hole {} complete", hole),
            EngineState::RoundComplete => write!(f, "round complete"),
        }
    }
}

/// The nearest hazard to the player's last position.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestHazard {
    pub hazard: Hazard,
    pub distance_m: f64,
}

/// Live distances derived from one position update.
///
/// `nearest_hazard` is `None` when the current hole has no hazards. A
/// session that has not yet processed any update has no report at all -
/// "no hazards" and "not yet computed" are distinct states.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReport {
    /// Hole the distances refer to.
    pub hole: u32,
    /// Great-circle distance from player to pin, meters.
    pub distance_to_pin_m: f64,
    /// Initial bearing from player to pin, degrees in [0, 360).
    pub bearing_to_pin_deg: f64,
    /// Closest hazard on the current hole, if the hole has any.
    pub nearest_hazard: Option<NearestHazard>,
}

/// Events emitted by the engine toward the host UI.
///
/// On a completing update the `DistanceUpdate` is emitted before the
/// `HoleComplete`, so live displays always see the final distance.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Fresh distances for live display.
    DistanceUpdate(DistanceReport),
    /// The given hole is finished.
    HoleComplete(u32),
    /// The final hole is finished.
    RoundComplete,
}

/// Errors reported by the engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// The course has no holes; a round cannot start.
    #[error("course has no holes")]
    EmptyCourse,

    /// Course data for the current hole is missing. The engine stays in its
    /// prior state; the round cannot safely continue past this hole.
    #[error("hole {0} not found in course data")]
    HoleNotFound(u32),

    /// An operation was requested in a state that does not allow it.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: EngineState,
    },
}

/// Read-only snapshot of the live session state owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSession {
    /// Current engine state.
    pub state: EngineState,
    /// Most recent qualifying player position, if any.
    pub last_position: Option<PlayerPosition>,
    /// Distances from the most recent update on the current hole, if any
    /// update has been processed since the hole started.
    pub last_report: Option<DistanceReport>,
}
