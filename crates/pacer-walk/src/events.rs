//! Walk telemetry events and the broadcast dispatcher that carries them.
//!
//! Emission never waits on listeners: `send` pushes into a
//! `tokio::sync::broadcast` ring and returns.  A listener that falls more
//! than `capacity` events behind skips ahead and loses the oldest ones.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use pacer_core::Coordinate;
use pacer_routing::Directions;

/// Something observable happened during a walk.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkEvent {
    /// The routing collaborator produced the path about to be walked.
    PathComputed(Arc<Directions>),

    /// The simulated position advanced this tick.
    Moved { position: Coordinate },

    /// A noisy position was transmitted to the network client.
    ImpreciseLocation { position: Coordinate },

    /// The humanized walking speed changed.
    SpeedChanged { old_kmh: f64, new_kmh: f64 },
}

/// Fan-out of [`WalkEvent`]s to any number of subscribers.
///
/// Cloning a dispatcher yields another sender into the same channel.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sender: broadcast::Sender<WalkEvent>,
}

impl EventDispatcher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Fire-and-forget.  Having no subscribers is not an error.
    #[inline]
    pub fn send(&self, event: WalkEvent) {
        let _ = self.sender.send(event);
    }

    /// Register a new listener.  It sees events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<WalkEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Run `handler` on a tokio task for every event until every sender
    /// is dropped.
    pub fn spawn_listener<F>(&self, mut handler: F) -> JoinHandle<()>
    where
        F: FnMut(WalkEvent) + Send + 'static,
    {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => handler(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "walk event listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(256)
    }
}
