//! Platform location source contract.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::mpsc;

/// Desired positioning accuracy, passed through to the platform service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccuracyClass {
    /// Full-accuracy GPS (the companion app's `enableHighAccuracy`).
    #[default]
    High,
    /// Network/cell-assisted positioning.
    Balanced,
    /// Coarse, battery-friendly positioning.
    LowPower,
}

/// Sampling policy for a tracking subscription.
///
/// Defaults mirror the companion app's watch options: report after 5 m of
/// movement, no faster than every 2 s, at high accuracy.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingPolicy {
    /// Minimum movement between reported updates, in meters.
    pub min_distance_m: f64,
    /// Minimum time between reported updates.
    pub min_interval: Duration,
    /// Desired accuracy class.
    pub accuracy: AccuracyClass,
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self {
            min_distance_m: 5.0,
            min_interval: Duration::from_secs(2),
            accuracy: AccuracyClass::High,
        }
    }
}

impl TrackingPolicy {
    /// A policy that passes every fix through unfiltered. Used by tests and
    /// trace replay, where the recorded samples already embody a policy.
    pub fn unfiltered() -> Self {
        Self {
            min_distance_m: 0.0,
            min_interval: Duration::ZERO,
            accuracy: AccuracyClass::High,
        }
    }
}

/// A raw position sample as delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceFix {
    /// Latitude in degrees. Not yet validated.
    pub latitude: f64,
    /// Longitude in degrees. Not yet validated.
    pub longitude: f64,
    /// Estimated horizontal error in meters, if the platform reports one.
    pub accuracy_m: Option<f64>,
    /// Device-reported sample time.
    pub timestamp: Instant,
}

impl SourceFix {
    /// Create a fix stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
            timestamp: Instant::now(),
        }
    }

    /// Create a fix with an explicit timestamp (trace replay, tests).
    pub fn at(latitude: f64, longitude: f64, timestamp: Instant) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
            timestamp,
        }
    }
}

/// Why positions are not currently available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The user denied the location permission.
    PermissionDenied,
    /// The platform service reported a failure.
    PlatformError(String),
    /// The platform delivered a fix with NaN or out-of-range coordinates.
    InvalidFix,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::PermissionDenied => write!(f, "location permission denied"),
            UnavailableReason::PlatformError(msg) => write!(f, "platform error: {}", msg),
            UnavailableReason::InvalidFix => write!(f, "invalid position fix"),
        }
    }
}

/// Event delivered by a platform source: a fix, or an outage signal.
///
/// Outages are data, not errors: the tracker forwards them to observers and
/// keeps the subscription alive so positions can resume.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    Fix(SourceFix),
    Unavailable(UnavailableReason),
}

/// Errors starting or running a tracking subscription.
#[derive(Debug, Error)]
pub enum LocationError {
    /// `start` was called while a subscription is already active.
    #[error("location tracking already started")]
    AlreadyTracking,

    /// The source could not produce a subscription at all.
    #[error("location source unavailable: {0}")]
    SourceUnavailable(String),
}

/// A platform location capability.
///
/// Implementations wrap device GPS, browser geolocation, or a simulation.
/// `subscribe` hands back the raw event stream; sampling policy beyond what
/// the platform applies natively is enforced by the tracker.
pub trait LocationSource: Send + Sync {
    /// Begin delivering events under `policy`.
    ///
    /// The receiver yields events in device-timestamp order. Dropping the
    /// receiver releases the underlying platform resource.
    fn subscribe(
        &self,
        policy: &TrackingPolicy,
    ) -> Result<mpsc::UnboundedReceiver<SourceEvent>, LocationError>;
}
