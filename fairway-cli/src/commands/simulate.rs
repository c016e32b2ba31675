//! Simulate command - replay a recorded GPS trace through a round session.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use fairway::clubs::{meters_to_yards, Club, ClubSet};
use fairway::course::Course;
use fairway::location::{SimulatedLocationSource, SimulatedSourceFeed, TrackingPolicy};
use fairway::progress::{ProgressEvent, RoundSession, RoundSessionConfig, SessionEvent};

use super::load_json;
use crate::error::CliError;

/// Run the simulate command.
pub fn run(
    course_path: &Path,
    trace_path: &Path,
    interval_ms: u64,
    clubs_path: Option<&Path>,
) -> Result<(), CliError> {
    let course: Course = load_json(course_path)?;
    let trace: Vec<(f64, f64)> = load_json(trace_path)?;
    let bag = match clubs_path {
        Some(path) => Some(ClubSet::new(load_json::<Vec<Club>>(path)?)),
        None => None,
    };

    println!("Fairway Trace Replay v{}", fairway::VERSION);
    println!("Course: {}", course);
    println!("Trace:  {} fixes, one every {} ms", trace.len(), interval_ms);
    println!();

    let runtime = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    runtime.block_on(replay(
        Arc::new(course),
        trace,
        Duration::from_millis(interval_ms),
        bag,
    ))
}

async fn replay(
    course: Arc<Course>,
    trace: Vec<(f64, f64)>,
    interval: Duration,
    bag: Option<ClubSet>,
) -> Result<(), CliError> {
    let (source, feed) = SimulatedLocationSource::channel();
    let session = RoundSession::start(
        Arc::new(source),
        course,
        RoundSessionConfig {
            // Recorded traces already embody a sampling policy
            policy: TrackingPolicy::unfiltered(),
            auto_advance: true,
        },
    )?;
    let mut events = session.subscribe();

    let feeder = tokio::spawn(feed_trace(feed, trace, interval));

    // Once the feeder finishes the source closes, so a quiet gap longer than
    // the feed interval means no further events are coming.
    let idle_limit = interval * 4 + Duration::from_millis(500);
    loop {
        let event = match tokio::time::timeout(idle_limit, events.recv()).await {
            Ok(Ok(event)) => event,
            Ok(Err(_)) | Err(_) => break,
        };

        match event {
            SessionEvent::Progress(ProgressEvent::DistanceUpdate(report)) => {
                let suggestion = bag
                    .as_ref()
                    .and_then(|bag| bag.suggest(report.distance_to_pin_m))
                    .map(|club| format!("  suggest {}", club))
                    .unwrap_or_default();
                let hazard = report
                    .nearest_hazard
                    .as_ref()
                    .map(|near| format!("  {} at {:.0} m", near.hazard.kind, near.distance_m))
                    .unwrap_or_default();
                println!(
                    "hole {:>2}  pin {:>5.0} m ({:.0} yd)  bearing {:>3.0}\u{00b0}{}{}",
                    report.hole,
                    report.distance_to_pin_m,
                    meters_to_yards(report.distance_to_pin_m),
                    report.bearing_to_pin_deg,
                    hazard,
                    suggestion
                );
            }
            SessionEvent::Progress(ProgressEvent::HoleComplete(hole)) => {
                println!();
                println!("*** Hole {} complete ***", hole);
                println!();
            }
            SessionEvent::Progress(ProgressEvent::RoundComplete) => {
                println!("*** Round complete ***");
                break;
            }
            SessionEvent::LocationUnavailable(reason) => {
                println!("(location unavailable: {})", reason);
            }
            SessionEvent::Error(err) => {
                println!("(engine error: {})", err);
                break;
            }
        }
    }

    session.stop();
    feeder.abort();
    debug!("trace replay finished");
    Ok(())
}

async fn feed_trace(feed: SimulatedSourceFeed, trace: Vec<(f64, f64)>, interval: Duration) {
    for (latitude, longitude) in trace {
        if !feed.send_fix(latitude, longitude) {
            break;
        }
        tokio::time::sleep(interval).await;
    }
    // Dropping the feed closes the simulated source
}
