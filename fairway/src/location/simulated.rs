//! Scripted location source for tests and trace replay.

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::source::{
    LocationError, LocationSource, SourceEvent, SourceFix, TrackingPolicy, UnavailableReason,
};

/// A [`LocationSource`] whose fixes are fed in by the caller.
///
/// Built as a pair: the source goes to the tracker, the [`SimulatedSourceFeed`]
/// stays with the test or CLI driver. Dropping the feed ends the stream, as a
/// platform service shutdown would.
pub struct SimulatedLocationSource {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<SourceEvent>>>,
}

/// Sending half of a simulated source.
#[derive(Clone)]
pub struct SimulatedSourceFeed {
    tx: mpsc::UnboundedSender<SourceEvent>,
}

impl SimulatedLocationSource {
    /// Create a source/feed pair.
    pub fn channel() -> (Self, SimulatedSourceFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                receiver: Mutex::new(Some(rx)),
            },
            SimulatedSourceFeed { tx },
        )
    }
}

impl LocationSource for SimulatedLocationSource {
    fn subscribe(
        &self,
        _policy: &TrackingPolicy,
    ) -> Result<mpsc::UnboundedReceiver<SourceEvent>, LocationError> {
        self.receiver.lock().take().ok_or_else(|| {
            LocationError::SourceUnavailable("simulated source already subscribed".to_string())
        })
    }
}

impl SimulatedSourceFeed {
    /// Deliver a fix stamped with the current time.
    ///
    /// Returns false if the subscription has been dropped.
    pub fn send_fix(&self, latitude: f64, longitude: f64) -> bool {
        self.tx
            .send(SourceEvent::Fix(SourceFix::new(latitude, longitude)))
            .is_ok()
    }

    /// Deliver a pre-built fix (explicit timestamp or accuracy).
    pub fn send(&self, fix: SourceFix) -> bool {
        self.tx.send(SourceEvent::Fix(fix)).is_ok()
    }

    /// Signal a platform outage.
    pub fn send_unavailable(&self, reason: UnavailableReason) -> bool {
        self.tx.send(SourceEvent::Unavailable(reason)).is_ok()
    }
}
