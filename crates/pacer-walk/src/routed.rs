//! The routed walk engine.

use std::sync::Arc;

use async_trait::async_trait;

use pacer_core::{Coordinate, WalkRng, WalkSettings};
use pacer_routing::DirectionsProvider;

use crate::stride::Strider;
use crate::{
    CancelSignal, EventDispatcher, NoopHook, PositionAck, PositionClient, SpeedVariant,
    StraightLineWalker, TickHook, WalkEvent, WalkResult, WalkStrategy,
};

/// Walks the path returned by a [`DirectionsProvider`], one waypoint at a
/// time.
///
/// # Type parameter
///
/// `D` is the routing collaborator.  When it reports quota exhaustion the
/// whole call is handed to the fallback strategy (a [`StraightLineWalker`]
/// unless replaced with [`with_fallback`][Self::with_fallback]).  The
/// fallback is built once here and reused for every later call.
pub struct RoutedWalker<D: DirectionsProvider> {
    directions: Arc<D>,
    strider:    Strider,
    fallback:   Box<dyn WalkStrategy>,
}

impl<D: DirectionsProvider> RoutedWalker<D> {
    pub fn new(
        client:     Arc<dyn PositionClient>,
        directions: Arc<D>,
        events:     EventDispatcher,
        settings:   WalkSettings,
        mut rng:    WalkRng,
    ) -> Self {
        let fallback = StraightLineWalker::new(
            Arc::clone(&client),
            events.clone(),
            settings.clone(),
            rng.child(1),
        );
        Self {
            directions,
            strider: Strider::new(client, events, settings, rng),
            fallback: Box::new(fallback),
        }
    }

    /// Replace the straight-line fallback.
    pub fn with_fallback(mut self, fallback: Box<dyn WalkStrategy>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn speed(&self) -> &SpeedVariant {
        self.strider.speed()
    }

    pub fn directions(&self) -> &Arc<D> {
        &self.directions
    }
}

#[async_trait]
impl<D: DirectionsProvider> WalkStrategy for RoutedWalker<D> {
    async fn walk(
        &mut self,
        target: Coordinate,
        on_tick: Option<&mut dyn TickHook>,
        cancel: &CancelSignal,
    ) -> WalkResult<PositionAck> {
        let mut state = self.strider.begin();
        let directions = self.directions.directions(state.position, &[], target).await?;

        if directions.status.is_quota_exhausted() {
            tracing::info!(to = %target, "directions quota exhausted, walking in a straight line");
            return self.fallback.walk(target, on_tick, cancel).await;
        }
        directions.ensure_ok()?;

        let directions = Arc::new(directions);
        tracing::info!(
            from = %state.position,
            to = %target,
            waypoints = directions.path.len(),
            "routed walk started"
        );
        self.strider.events().send(WalkEvent::PathComputed(Arc::clone(&directions)));

        let mut noop = NoopHook;
        let hook: &mut dyn TickHook = match on_tick {
            Some(h) => h,
            None => &mut noop,
        };

        for &waypoint in &directions.path {
            if let Some(ack) = self
                .strider
                .leg_or_arrive(&mut state, waypoint, target, &mut *hook, cancel)
                .await?
            {
                return Ok(ack);
            }
        }

        let ack = self.strider.report_final(state.position, cancel).await?;
        tracing::info!(at = %ack.position, "routed walk finished");
        Ok(ack)
    }
}
