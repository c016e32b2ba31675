//! Location tracker: subscription lifecycle and sampling policy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::geo::{self, Coordinate};

use super::source::{
    LocationError, LocationSource, SourceEvent, SourceFix, TrackingPolicy, UnavailableReason,
};

/// Broadcast capacity for location events. Observers that fall this far
/// behind see a `Lagged` error and resume from the newest sample.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A normalized, validated player position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPosition {
    /// Validated coordinate.
    pub coordinate: Coordinate,
    /// Device-reported sample time.
    pub timestamp: Instant,
}

/// Event published to tracker observers.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// A qualifying position update.
    Position(PlayerPosition),
    /// Positions are currently unavailable; the subscription stays alive.
    Unavailable(UnavailableReason),
}

struct ActiveSubscription {
    id: u64,
    token: CancellationToken,
}

/// Wraps a [`LocationSource`] and manages one exclusive subscription at a
/// time: `start` acquires the platform resource, the returned handle (or its
/// drop) releases it.
pub struct LocationTracker {
    source: Arc<dyn LocationSource>,
    events: broadcast::Sender<LocationEvent>,
    active: Arc<Mutex<Option<ActiveSubscription>>>,
    next_id: AtomicU64,
}

impl LocationTracker {
    /// Create a tracker over the given platform source.
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            events,
            active: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to location events. May be called before or after `start`.
    pub fn subscribe(&self) -> broadcast::Receiver<LocationEvent> {
        self.events.subscribe()
    }

    /// Start tracking under `policy`.
    ///
    /// Fails with [`LocationError::AlreadyTracking`] if a subscription is
    /// already running. Must be called from within a Tokio runtime.
    pub fn start(&self, policy: TrackingPolicy) -> Result<TrackingHandle, LocationError> {
        let mut active = self.active.lock();
        if let Some(sub) = active.as_ref() {
            if !sub.token.is_cancelled() {
                return Err(LocationError::AlreadyTracking);
            }
        }

        let rx = self.source.subscribe(&policy)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        tokio::spawn(pump(
            rx,
            policy,
            self.events.clone(),
            token.clone(),
            Arc::clone(&self.active),
            id,
        ));

        *active = Some(ActiveSubscription {
            id,
            token: token.clone(),
        });
        debug!(subscription = id, "location tracking started");

        Ok(TrackingHandle { token })
    }

    /// Stop the current subscription, if any. Idempotent.
    pub fn stop(&self) {
        if let Some(sub) = self.active.lock().as_ref() {
            sub.token.cancel();
        }
    }

    /// Whether a subscription is currently running.
    pub fn is_tracking(&self) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|sub| !sub.token.is_cancelled())
    }
}

/// Handle for an active tracking subscription.
///
/// Stopping is idempotent, and dropping the handle stops the subscription:
/// the platform resource is released on every exit path, including host
/// teardown.
pub struct TrackingHandle {
    token: CancellationToken,
}

impl TrackingHandle {
    /// Stop the subscription. Calling this on an already-stopped handle is a
    /// no-op.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether this subscription has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TrackingHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Forward source events to observers, applying the sampling policy.
async fn pump(
    mut rx: mpsc::UnboundedReceiver<SourceEvent>,
    policy: TrackingPolicy,
    events: broadcast::Sender<LocationEvent>,
    token: CancellationToken,
    active: Arc<Mutex<Option<ActiveSubscription>>>,
    id: u64,
) {
    let mut last_emitted: Option<PlayerPosition> = None;

    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            event = rx.recv() => match event {
                None => break, // source closed
                Some(SourceEvent::Unavailable(reason)) => {
                    warn!(%reason, "location unavailable");
                    let _ = events.send(LocationEvent::Unavailable(reason));
                }
                Some(SourceEvent::Fix(fix)) => match normalize(&fix) {
                    Err(err) => {
                        warn!(error = %err, lat = fix.latitude, lon = fix.longitude,
                              "dropping invalid location fix");
                        let _ = events.send(LocationEvent::Unavailable(
                            UnavailableReason::InvalidFix,
                        ));
                    }
                    Ok(position) => {
                        if qualifies(&policy, last_emitted.as_ref(), &position) {
                            last_emitted = Some(position);
                            let _ = events.send(LocationEvent::Position(position));
                        }
                    }
                },
            },
        }
    }

    // Release the tracker slot, but only if it is still ours: a newer
    // subscription may have replaced a cancelled one.
    let mut slot = active.lock();
    if slot.as_ref().map(|sub| sub.id) == Some(id) {
        *slot = None;
    }
    debug!(subscription = id, "location tracking stopped");
}

fn normalize(fix: &SourceFix) -> Result<PlayerPosition, crate::geo::GeoError> {
    let coordinate = Coordinate::new(fix.latitude, fix.longitude)?;
    Ok(PlayerPosition {
        coordinate,
        timestamp: fix.timestamp,
    })
}

/// Apply the policy's minimum interval and minimum movement. The first fix
/// after start always qualifies.
fn qualifies(
    policy: &TrackingPolicy,
    last: Option<&PlayerPosition>,
    next: &PlayerPosition,
) -> bool {
    let Some(last) = last else {
        return true;
    };

    let elapsed = next.timestamp.saturating_duration_since(last.timestamp);
    if elapsed < policy.min_interval {
        return false;
    }

    geo::distance_m(&last.coordinate, &next.coordinate) >= policy.min_distance_m
}
