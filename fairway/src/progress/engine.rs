//! The hole-progress state machine.

use std::sync::Arc;

use tracing::{debug, info};

use crate::course::{Course, Hazard};
use crate::geo::{self, Coordinate};
use crate::location::PlayerPosition;

use super::model::{
    DistanceReport, EngineError, EngineState, NearestHazard, ProgressEvent, TrackingSession,
    HOLE_COMPLETION_THRESHOLD_M,
};

/// Synchronous hole-progress state machine.
///
/// The engine is the sole writer of its session state. Each call either
/// completes fully or returns an error with no partial mutation. It assumes
/// the course has already passed [`Course::validate`]; missing hole data is
/// still handled defensively via [`EngineError::HoleNotFound`].
#[derive(Debug)]
pub struct HoleProgressEngine {
    course: Arc<Course>,
    state: EngineState,
    last_position: Option<PlayerPosition>,
    last_report: Option<DistanceReport>,
}

impl HoleProgressEngine {
    /// Create an engine over a loaded course. The engine starts `Idle`.
    pub fn new(course: Arc<Course>) -> Self {
        Self {
            course,
            state: EngineState::Idle,
            last_position: None,
            last_report: None,
        }
    }

    /// Begin the round at the first hole.
    pub fn start_round(&mut self) -> Result<u32, EngineError> {
        match self.state {
            EngineState::Idle => {
                let first = self
                    .course
                    .first_hole_number()
                    .ok_or(EngineError::EmptyCourse)?;
                self.state = EngineState::Tracking { hole: first };
                debug!(hole = first, "round started");
                Ok(first)
            }
            state => Err(EngineError::InvalidTransition {
                action: "start round",
                state,
            }),
        }
    }

    /// Process one player position.
    ///
    /// While `Tracking(h)`: recomputes distance-to-pin and nearest hazard,
    /// emits a [`ProgressEvent::DistanceUpdate`], then runs the completion
    /// check (strict `< HOLE_COMPLETION_THRESHOLD_M`). In any other state
    /// the position is ignored and no events are emitted.
    pub fn on_position(
        &mut self,
        position: &PlayerPosition,
    ) -> Result<Vec<ProgressEvent>, EngineError> {
        let hole_number = match self.state {
            EngineState::Tracking { hole } => hole,
            _ => return Ok(Vec::new()),
        };

        let hole = self
            .course
            .hole(hole_number)
            .ok_or(EngineError::HoleNotFound(hole_number))?;

        let report = DistanceReport {
            hole: hole_number,
            distance_to_pin_m: geo::distance_m(&position.coordinate, &hole.pin),
            bearing_to_pin_deg: geo::initial_bearing_deg(&position.coordinate, &hole.pin),
            nearest_hazard: nearest_hazard(&position.coordinate, &hole.hazards),
        };

        self.last_position = Some(*position);
        self.last_report = Some(report.clone());

        // Distance update is published before the completion check so live
        // displays always see the final distance.
        let mut events = vec![ProgressEvent::DistanceUpdate(report.clone())];

        if report.distance_to_pin_m < HOLE_COMPLETION_THRESHOLD_M {
            self.state = EngineState::HoleComplete { hole: hole_number };
            info!(
                hole = hole_number,
                distance_m = report.distance_to_pin_m,
                "hole complete"
            );
            events.push(ProgressEvent::HoleComplete(hole_number));
        }

        Ok(events)
    }

    /// Advance past a completed hole, host-driven.
    ///
    /// Moves to `Tracking(h+1)`, or to `RoundComplete` if the finished hole
    /// was the course's last.
    pub fn advance_hole(&mut self) -> Result<Vec<ProgressEvent>, EngineError> {
        match self.state {
            EngineState::HoleComplete { hole } => {
                if Some(hole) == self.course.last_hole_number() {
                    self.state = EngineState::RoundComplete;
                    info!("round complete");
                    return Ok(vec![ProgressEvent::RoundComplete]);
                }

                let next = hole + 1;
                if self.course.hole(next).is_none() {
                    return Err(EngineError::HoleNotFound(next));
                }

                self.state = EngineState::Tracking { hole: next };
                // Distances from the previous hole are stale for the new one
                self.last_report = None;
                debug!(hole = next, "tracking next hole");
                Ok(Vec::new())
            }
            state => Err(EngineError::InvalidTransition {
                action: "advance hole",
                state,
            }),
        }
    }

    /// Current engine state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Hole currently being tracked, if any.
    pub fn current_hole(&self) -> Option<u32> {
        match self.state {
            EngineState::Tracking { hole } | EngineState::HoleComplete { hole } => Some(hole),
            _ => None,
        }
    }

    /// The course this engine is tracking against.
    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }

    /// Snapshot of the live session state.
    pub fn session(&self) -> TrackingSession {
        TrackingSession {
            state: self.state,
            last_position: self.last_position,
            last_report: self.last_report.clone(),
        }
    }
}

/// Closest hazard to `point`, or `None` for a hazard-free hole.
fn nearest_hazard(point: &Coordinate, hazards: &[Hazard]) -> Option<NearestHazard> {
    let mut nearest: Option<NearestHazard> = None;

    for hazard in hazards {
        let distance_m = geo::distance_m(point, &hazard.location);
        if nearest.as_ref().is_none_or(|n| distance_m < n.distance_m) {
            nearest = Some(NearestHazard {
                hazard: *hazard,
                distance_m,
            });
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::course::{fixtures, HazardKind, Hole};

    /// One degree of latitude is ~111,195 m; used to place positions at
    /// exact meter offsets from the pin along a meridian.
    const DEG_PER_METER_LAT: f64 = 1.0 / 111_195.08;

    fn at(lat: f64, lon: f64) -> PlayerPosition {
        PlayerPosition {
            coordinate: Coordinate::new(lat, lon).unwrap(),
            timestamp: Instant::now(),
        }
    }

    /// A position `meters` south of the given point.
    fn meters_south_of(lat: f64, lon: f64, meters: f64) -> PlayerPosition {
        at(lat - meters * DEG_PER_METER_LAT, lon)
    }

    fn started_engine() -> HoleProgressEngine {
        let mut engine = HoleProgressEngine::new(Arc::new(fixtures::test_course()));
        engine.start_round().unwrap();
        engine
    }

    #[test]
    fn test_start_round_begins_at_first_hole() {
        let mut engine = HoleProgressEngine::new(Arc::new(fixtures::test_course()));
        assert_eq!(engine.state(), EngineState::Idle);

        assert_eq!(engine.start_round(), Ok(1));
        assert_eq!(engine.state(), EngineState::Tracking { hole: 1 });
    }

    #[test]
    fn test_start_round_twice_is_an_error() {
        let mut engine = started_engine();
        assert_eq!(
            engine.start_round(),
            Err(EngineError::InvalidTransition {
                action: "start round",
                state: EngineState::Tracking { hole: 1 },
            })
        );
    }

    #[test]
    fn test_start_round_on_empty_course() {
        let course = Course {
            name: "Empty".to_string(),
            holes: Vec::new(),
        };
        let mut engine = HoleProgressEngine::new(Arc::new(course));
        assert_eq!(engine.start_round(), Err(EngineError::EmptyCourse));
    }

    #[test]
    fn test_position_updates_distance_and_bearing() {
        let mut engine = started_engine();

        // Standing on the tee of hole 1
        let events = engine.on_position(&at(36.5713, -121.9505)).unwrap();
        assert_eq!(events.len(), 1);

        let ProgressEvent::DistanceUpdate(report) = &events[0] else {
            panic!("expected a distance update, got {:?}", events[0]);
        };
        assert_eq!(report.hole, 1);
        assert!(
            report.distance_to_pin_m > 85.0 && report.distance_to_pin_m < 95.0,
            "tee shot distance should be ~90 m, got {:.1}",
            report.distance_to_pin_m
        );
        assert!((0.0..360.0).contains(&report.bearing_to_pin_deg));

        let session = engine.session();
        assert!(session.last_position.is_some());
        assert_eq!(session.last_report.as_ref().unwrap().hole, 1);
    }

    #[test]
    fn test_nearest_hazard_picks_the_closer_one() {
        // Hole 1 has a bunker at (36.5715, -121.9507) and water at
        // (36.5718, -121.9509). From just south of the bunker, the bunker
        // is ~12 m away and the water ~47 m.
        let mut engine = started_engine();
        let pos = meters_south_of(36.5715, -121.9507, 12.0);

        let events = engine.on_position(&pos).unwrap();
        let ProgressEvent::DistanceUpdate(report) = &events[0] else {
            panic!("expected a distance update");
        };

        let nearest = report.nearest_hazard.as_ref().unwrap();
        assert_eq!(nearest.hazard.kind, HazardKind::Bunker);
        assert!(
            (nearest.distance_m - 12.0).abs() < 0.5,
            "expected ~12 m to the bunker, got {:.1}",
            nearest.distance_m
        );
    }

    #[test]
    fn test_hazard_free_hole_reports_none() {
        let mut course = fixtures::test_course();
        course.holes[0].hazards.clear();
        let mut engine = HoleProgressEngine::new(Arc::new(course));
        engine.start_round().unwrap();

        let events = engine.on_position(&at(36.5713, -121.9505)).unwrap();
        let ProgressEvent::DistanceUpdate(report) = &events[0] else {
            panic!("expected a distance update");
        };
        assert_eq!(report.nearest_hazard, None);
    }

    #[test]
    fn test_completion_at_5_meters() {
        let mut engine = started_engine();
        let pos = meters_south_of(36.5720, -121.9510, 5.0);

        let events = engine.on_position(&pos).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ProgressEvent::DistanceUpdate(_)));
        assert_eq!(events[1], ProgressEvent::HoleComplete(1));
        assert_eq!(engine.state(), EngineState::HoleComplete { hole: 1 });
    }

    #[test]
    fn test_no_completion_at_15_meters() {
        let mut engine = started_engine();
        let pos = meters_south_of(36.5720, -121.9510, 15.0);

        let events = engine.on_position(&pos).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.state(), EngineState::Tracking { hole: 1 });
    }

    #[test]
    fn test_completion_threshold_is_strict() {
        // Just outside the threshold: not complete. An exact 10.000 m
        // offset isn't constructible in floats, so probe either side.
        let mut engine = started_engine();
        let pos = meters_south_of(36.5720, -121.9510, HOLE_COMPLETION_THRESHOLD_M + 0.05);

        let events = engine.on_position(&pos).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(engine.state(), EngineState::Tracking { hole: 1 });

        // Just inside: complete
        let pos = meters_south_of(36.5720, -121.9510, HOLE_COMPLETION_THRESHOLD_M - 0.05);
        let events = engine.on_position(&pos).unwrap();
        assert_eq!(events.last(), Some(&ProgressEvent::HoleComplete(1)));
    }

    #[test]
    fn test_positions_ignored_while_hole_complete() {
        let mut engine = started_engine();
        engine
            .on_position(&meters_south_of(36.5720, -121.9510, 5.0))
            .unwrap();
        assert_eq!(engine.state(), EngineState::HoleComplete { hole: 1 });

        let events = engine.on_position(&at(36.5713, -121.9505)).unwrap();
        assert!(events.is_empty());
        assert_eq!(engine.state(), EngineState::HoleComplete { hole: 1 });
    }

    #[test]
    fn test_advance_to_next_hole_clears_report() {
        let mut engine = started_engine();
        engine
            .on_position(&meters_south_of(36.5720, -121.9510, 5.0))
            .unwrap();

        let events = engine.advance_hole().unwrap();
        assert!(events.is_empty());
        assert_eq!(engine.state(), EngineState::Tracking { hole: 2 });

        // Last hole's distances don't leak into the new hole
        let session = engine.session();
        assert_eq!(session.last_report, None);
        assert!(session.last_position.is_some());
    }

    #[test]
    fn test_advance_past_last_hole_completes_round() {
        let mut engine = started_engine();

        for hole in 1..=3u32 {
            let pin = engine.course().hole(hole).unwrap().pin;
            let events = engine
                .on_position(&meters_south_of(pin.latitude, pin.longitude, 4.0))
                .unwrap();
            assert_eq!(events.last(), Some(&ProgressEvent::HoleComplete(hole)));

            let events = engine.advance_hole().unwrap();
            if hole == 3 {
                assert_eq!(events, vec![ProgressEvent::RoundComplete]);
                assert_eq!(engine.state(), EngineState::RoundComplete);
            } else {
                assert_eq!(engine.state(), EngineState::Tracking { hole: hole + 1 });
            }
        }
    }

    #[test]
    fn test_advance_while_tracking_is_an_error() {
        let mut engine = started_engine();
        assert_eq!(
            engine.advance_hole(),
            Err(EngineError::InvalidTransition {
                action: "advance hole",
                state: EngineState::Tracking { hole: 1 },
            })
        );
    }

    #[test]
    fn test_missing_hole_reports_error_without_state_change() {
        // A course that dodges validation's consecutive-numbering guarantee:
        // the engine must still fail safe on inconsistent data.
        let mut course = fixtures::test_course();
        course.holes.remove(1);
        let mut engine = HoleProgressEngine::new(Arc::new(course));
        engine.start_round().unwrap();
        engine
            .on_position(&meters_south_of(36.5720, -121.9510, 5.0))
            .unwrap();

        assert_eq!(engine.advance_hole(), Err(EngineError::HoleNotFound(2)));
        assert_eq!(engine.state(), EngineState::HoleComplete { hole: 1 });

        let before = engine.session();
        assert_eq!(engine.advance_hole(), Err(EngineError::HoleNotFound(2)));
        assert_eq!(engine.session(), before);
    }

    #[test]
    fn test_round_complete_ignores_positions() {
        let one_hole = Course {
            name: "Single".to_string(),
            holes: vec![Hole {
                number: 1,
                par: 4,
                tee: Coordinate::new(36.5713, -121.9505).unwrap(),
                pin: Coordinate::new(36.5720, -121.9510).unwrap(),
                hazards: Vec::new(),
            }],
        };
        let mut engine = HoleProgressEngine::new(Arc::new(one_hole));
        engine.start_round().unwrap();
        engine
            .on_position(&meters_south_of(36.5720, -121.9510, 3.0))
            .unwrap();
        assert_eq!(
            engine.advance_hole().unwrap(),
            vec![ProgressEvent::RoundComplete]
        );

        let events = engine.on_position(&at(36.5713, -121.9505)).unwrap();
        assert!(events.is_empty());
        assert_eq!(engine.state(), EngineState::RoundComplete);
    }
}
