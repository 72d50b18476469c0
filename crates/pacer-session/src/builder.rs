//! Fluent builder for constructing a [`Session`].

use std::sync::Arc;

use tracing::info;

use pacer_core::WalkRng;
use pacer_routing::DirectionsProvider;
use pacer_walk::EventDispatcher;

use crate::session::ClientParts;
use crate::{ClientFactory, Session, SessionConfig, SessionResult, SessionStats};

const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Fluent builder for [`Session<F, D>`].
///
/// # Optional inputs
///
/// | Method                 | Default                       |
/// |------------------------|-------------------------------|
/// | `.seed(s)`             | OS entropy                    |
/// | `.event_capacity(n)`   | 256 buffered events per lagging listener |
///
/// # Example
///
/// ```rust,ignore
/// let config = SessionConfig::load("pacer.toml")?;
/// let mut session = SessionBuilder::new(config, MyFactory, Arc::new(StraightLineDirections))
///     .seed(7)
///     .build()?;
/// session.walk_to(target, None, &CancelSignal::never()).await?;
/// ```
pub struct SessionBuilder<F: ClientFactory, D: DirectionsProvider + 'static> {
    config:         SessionConfig,
    factory:        F,
    directions:     Arc<D>,
    seed:           Option<u64>,
    event_capacity: usize,
}

impl<F: ClientFactory, D: DirectionsProvider + 'static> SessionBuilder<F, D> {
    pub fn new(config: SessionConfig, factory: F, directions: Arc<D>) -> Self {
        Self {
            config,
            factory,
            directions,
            seed: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Make every random draw of the session reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Validate the configuration, restore the last position and connect
    /// the first client.
    pub fn build(self) -> SessionResult<Session<F, D>> {
        self.config.validate()?;

        let mut rng = match self.seed {
            Some(seed) => WalkRng::new(seed),
            None => WalkRng::from_entropy(),
        };
        let events = EventDispatcher::new(self.event_capacity);
        let generation = 1;

        let parts = ClientParts::connect(
            &self.factory,
            &self.directions,
            &events,
            &self.config,
            self.config.client.clone(),
            rng.child(generation),
        )?;

        let mut config = self.config;
        config.client = parts.settings.clone();
        info!(seeded = parts.seeded.is_some(), "session ready");

        Ok(Session {
            config,
            factory: self.factory,
            directions: self.directions,
            events,
            stats: SessionStats::new(),
            rng,
            generation,
            parts,
        })
    }
}
