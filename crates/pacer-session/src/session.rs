//! The `Session` container and its reset cycle.

use std::sync::Arc;

use tracing::{info, warn};

use pacer_core::{Coordinate, WalkRng};
use pacer_routing::DirectionsProvider;
use pacer_walk::{
    CancelSignal, EventDispatcher, PositionAck, PositionClient, RoutedWalker, TickHook,
    WalkResult, WalkStrategy,
};

use crate::last_position::load_last_position;
use crate::{ClientSettings, SessionConfig, SessionResult, SessionStats};

// ── Collaborator seam ─────────────────────────────────────────────────────────

/// Builds the game client and the services that hang off it.
///
/// Both methods are called once per [`Session::reset`], always in the order
/// `connect` then `inventory`, and always for the same client.
pub trait ClientFactory: Send + Sync {
    type Client: PositionClient + 'static;
    type Inventory: Send;

    /// `settings` already carries the restored last position, if any.
    fn connect(&self, settings: &ClientSettings) -> SessionResult<Self::Client>;

    fn inventory(&self, client: &Arc<Self::Client>, config: &SessionConfig) -> Self::Inventory;
}

// ── Navigation ────────────────────────────────────────────────────────────────

/// The walk strategy bound to the session's current client.
pub struct Navigation {
    strategy: Box<dyn WalkStrategy>,
}

impl Navigation {
    pub fn new(strategy: Box<dyn WalkStrategy>) -> Self {
        Self { strategy }
    }

    /// A [`RoutedWalker`] over `client`, with its default straight-line
    /// fallback.
    pub fn routed<D: DirectionsProvider + 'static>(
        client:     Arc<dyn PositionClient>,
        directions: Arc<D>,
        events:     EventDispatcher,
        config:     &SessionConfig,
        rng:        WalkRng,
    ) -> Self {
        let walker = RoutedWalker::new(client, directions, events, config.walk.clone(), rng);
        Self::new(Box::new(walker))
    }

    pub async fn walk_to(
        &mut self,
        target: Coordinate,
        on_tick: Option<&mut dyn TickHook>,
        cancel: &CancelSignal,
    ) -> WalkResult<PositionAck> {
        self.strategy.walk(target, on_tick, cancel).await
    }
}

// ── Client-bound parts ────────────────────────────────────────────────────────

/// Everything that holds a reference to one client.  Built and replaced as
/// a unit.
pub(crate) struct ClientParts<F: ClientFactory> {
    pub client:     Arc<F::Client>,
    pub navigation: Navigation,
    pub inventory:  F::Inventory,
    pub settings:   ClientSettings,
    pub seeded:     Option<Coordinate>,
}

impl<F: ClientFactory> ClientParts<F> {
    pub(crate) fn connect<D: DirectionsProvider + 'static>(
        factory:    &F,
        directions: &Arc<D>,
        events:     &EventDispatcher,
        config:     &SessionConfig,
        mut settings: ClientSettings,
        rng:        WalkRng,
    ) -> SessionResult<Self> {
        let seeded = load_last_position(&settings.profile_config_path, settings.default_altitude);
        if let Some(position) = seeded {
            info!(%position, "restoring last known position");
            settings.default_latitude = position.latitude;
            settings.default_longitude = position.longitude;
        }

        let client = Arc::new(factory.connect(&settings)?);
        let shared: Arc<dyn PositionClient> = client.clone();
        let navigation = Navigation::routed(shared, Arc::clone(directions), events.clone(), config, rng);
        let inventory = factory.inventory(&client, config);

        Ok(Self { client, navigation, inventory, settings, seeded })
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Process-wide container: one client, the navigation and inventory built
/// on it, the event dispatcher, and walk statistics.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct Session<F: ClientFactory, D: DirectionsProvider + 'static> {
    pub(crate) config:     SessionConfig,
    pub(crate) factory:    F,
    pub(crate) directions: Arc<D>,
    pub(crate) events:     EventDispatcher,
    pub(crate) stats:      SessionStats,
    pub(crate) rng:        WalkRng,
    /// Number of clients connected so far; seeds each navigation's RNG.
    pub(crate) generation: u64,
    pub(crate) parts:      ClientParts<F>,
}

impl<F: ClientFactory, D: DirectionsProvider + 'static> Session<F, D> {
    /// Connect a new client and rebuild navigation and inventory on it.
    ///
    /// On error the session keeps its previous client and dependents.
    pub fn reset(&mut self, client_settings: ClientSettings) -> SessionResult<()> {
        self.generation += 1;
        let rng = self.rng.child(self.generation);
        let parts = ClientParts::connect(
            &self.factory,
            &self.directions,
            &self.events,
            &self.config,
            client_settings,
            rng,
        )?;
        self.config.client = parts.settings.clone();
        self.parts = parts;
        info!(generation = self.generation, "session reset");
        Ok(())
    }

    /// Walk to `target` and record the outcome in [`SessionStats`].
    pub async fn walk_to(
        &mut self,
        target: Coordinate,
        on_tick: Option<&mut dyn TickHook>,
        cancel: &CancelSignal,
    ) -> SessionResult<PositionAck> {
        let start = self.parts.client.current_position();
        match self.parts.navigation.walk_to(target, on_tick, cancel).await {
            Ok(ack) => {
                let distance_m = start.distance_to(&ack.position);
                self.stats.record_completed(distance_m);
                info!(to = %ack.position, distance_m, "walk finished");
                Ok(ack)
            }
            Err(e) if e.is_cancelled() => {
                self.stats.record_cancelled();
                Err(e.into())
            }
            Err(e) => {
                warn!(error = %e, "walk failed");
                self.stats.record_failed();
                Err(e.into())
            }
        }
    }

    pub fn client(&self) -> &Arc<F::Client> {
        &self.parts.client
    }

    pub fn inventory(&self) -> &F::Inventory {
        &self.parts.inventory
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn directions(&self) -> &Arc<D> {
        &self.directions
    }

    /// The position restored from `LastPos.ini` at the last reset.
    pub fn seeded_position(&self) -> Option<Coordinate> {
        self.parts.seeded
    }
}
