//! Round session: wires the location tracker to the progress engine.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::course::{Course, CourseError};
use crate::location::{
    LocationError, LocationEvent, LocationSource, LocationTracker, TrackingHandle, TrackingPolicy,
    UnavailableReason,
};

use super::engine::HoleProgressEngine;
use super::model::{EngineError, ProgressEvent};

/// Broadcast capacity for session events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events published to session observers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Engine progress: distance updates, hole completions, round complete.
    Progress(ProgressEvent),
    /// Positions are currently unavailable; the session continues in a
    /// degraded state with distances unavailable until position resumes.
    LocationUnavailable(UnavailableReason),
    /// An engine error surfaced asynchronously (e.g. inconsistent course
    /// data mid-round). The round cannot safely continue past it.
    Error(EngineError),
}

/// Errors starting a round session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The course failed validation; the round must not start.
    #[error("invalid course: {0}")]
    Course(#[from] CourseError),

    /// The location subscription could not be started.
    #[error("location tracking failed: {0}")]
    Location(#[from] LocationError),

    /// The engine refused to start the round.
    #[error("{0}")]
    Engine(#[from] EngineError),
}

/// Configuration for a round session.
#[derive(Debug, Clone)]
pub struct RoundSessionConfig {
    /// Sampling policy handed to the location tracker.
    pub policy: TrackingPolicy,
    /// Advance to the next hole immediately when a hole completes, instead
    /// of waiting for an explicit `advance_hole` call from the host.
    pub auto_advance: bool,
}

impl Default for RoundSessionConfig {
    fn default() -> Self {
        Self {
            policy: TrackingPolicy::default(),
            auto_advance: false,
        }
    }
}

enum SessionCommand {
    AdvanceHole,
}

/// A live tracking session for one round.
///
/// Owns the engine on a background task; the host observes via
/// [`RoundSession::subscribe`]. Stopping the session (explicitly or by
/// dropping it) synchronously cancels the location subscription, and a
/// stopped session never mutates state or emits events again - late
/// platform callbacks land after the engine task has exited.
pub struct RoundSession {
    events: broadcast::Sender<SessionEvent>,
    commands: mpsc::UnboundedSender<SessionCommand>,
    token: CancellationToken,
}

impl RoundSession {
    /// Validate the course, start location tracking, and begin the round.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        source: Arc<dyn LocationSource>,
        course: Arc<Course>,
        config: RoundSessionConfig,
    ) -> Result<Self, SessionError> {
        course.validate()?;

        let mut engine = HoleProgressEngine::new(Arc::clone(&course));
        let first = engine.start_round()?;

        let tracker = LocationTracker::new(source);
        let locations = tracker.subscribe();
        let handle = tracker.start(config.policy.clone())?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (commands, commands_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        info!(course = %course, hole = first, "round session started");

        tokio::spawn(run(
            engine,
            handle,
            locations,
            commands_rx,
            events.clone(),
            token.clone(),
            config.auto_advance,
        ));

        Ok(Self {
            events,
            commands,
            token,
        })
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Advance past a completed hole.
    ///
    /// Returns false if the session has already stopped.
    pub fn advance_hole(&self) -> bool {
        self.commands.send(SessionCommand::AdvanceHole).is_ok()
    }

    /// Stop the session. Idempotent; also runs on drop.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether the session has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for RoundSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Session event loop. Owns the engine; exits on cancellation, which is what
/// guarantees that stale updates cannot touch a stopped session.
async fn run(
    mut engine: HoleProgressEngine,
    handle: TrackingHandle,
    mut locations: broadcast::Receiver<LocationEvent>,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    events: broadcast::Sender<SessionEvent>,
    token: CancellationToken,
    auto_advance: bool,
) {
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            command = commands.recv() => match command {
                None => break, // session dropped
                Some(SessionCommand::AdvanceHole) => {
                    apply(&mut engine, &events, HoleProgressEngine::advance_hole);
                }
            },

            location = locations.recv() => match location {
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    // Superseded samples; resume from the newest
                    warn!(missed, "session lagged behind location updates");
                }
                Ok(LocationEvent::Unavailable(reason)) => {
                    let _ = events.send(SessionEvent::LocationUnavailable(reason));
                }
                Ok(LocationEvent::Position(position)) => {
                    let completed = apply(&mut engine, &events, |engine| {
                        engine.on_position(&position)
                    });
                    if completed && auto_advance {
                        apply(&mut engine, &events, HoleProgressEngine::advance_hole);
                    }
                }
            },
        }
    }

    handle.stop();
    debug!("round session stopped");
}

/// Run one engine operation, forwarding its events or error to observers.
/// Returns true if a hole (or the round) completed.
fn apply(
    engine: &mut HoleProgressEngine,
    events: &broadcast::Sender<SessionEvent>,
    op: impl FnOnce(&mut HoleProgressEngine) -> Result<Vec<ProgressEvent>, EngineError>,
) -> bool {
    match op(engine) {
        Ok(progress) => {
            let mut completed = false;
            for event in progress {
                completed |= matches!(event, ProgressEvent::HoleComplete(_));
                let _ = events.send(SessionEvent::Progress(event));
            }
            completed
        }
        Err(err) => {
            warn!(error = %err, "engine error");
            let _ = events.send(SessionEvent::Error(err));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::fixtures;
    use crate::location::SimulatedLocationSource;

    #[tokio::test]
    async fn test_start_rejects_invalid_course() {
        let (source, _feed) = SimulatedLocationSource::channel();
        let empty = Course {
            name: "Empty".to_string(),
            holes: Vec::new(),
        };

        let result = RoundSession::start(
            Arc::new(source),
            Arc::new(empty),
            RoundSessionConfig::default(),
        );
        assert!(matches!(
            result,
            Err(SessionError::Course(CourseError::NoHoles))
        ));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let (source, _feed) = SimulatedLocationSource::channel();
        let session = RoundSession::start(
            Arc::new(source),
            Arc::new(fixtures::test_course()),
            RoundSessionConfig::default(),
        )
        .unwrap();

        assert!(!session.is_stopped());
        session.stop();
        session.stop();
        assert!(session.is_stopped());
    }

    #[tokio::test]
    async fn test_advance_hole_after_stop_returns_false() {
        let (source, _feed) = SimulatedLocationSource::channel();
        let session = RoundSession::start(
            Arc::new(source),
            Arc::new(fixtures::test_course()),
            RoundSessionConfig::default(),
        )
        .unwrap();

        session.stop();
        // Give the event loop a chance to observe cancellation and exit
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert!(!session.advance_hole());
    }
}
