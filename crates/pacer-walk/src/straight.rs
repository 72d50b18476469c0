//! Straight-line walking, used when the routing provider is unavailable.

use std::sync::Arc;

use async_trait::async_trait;

use pacer_core::{Coordinate, WalkRng, WalkSettings};

use crate::stride::Strider;
use crate::{
    CancelSignal, EventDispatcher, NoopHook, PositionAck, PositionClient, SpeedVariant, TickHook,
    WalkResult, WalkStrategy,
};

/// Walks directly toward the target along the great-circle bearing, with
/// the same speed drift, noise, and report throttling as the routed
/// engine.  Never consults a routing provider.
pub struct StraightLineWalker {
    strider: Strider,
}

impl StraightLineWalker {
    pub fn new(
        client:   Arc<dyn PositionClient>,
        events:   EventDispatcher,
        settings: WalkSettings,
        rng:      WalkRng,
    ) -> Self {
        Self { strider: Strider::new(client, events, settings, rng) }
    }

    pub fn speed(&self) -> &SpeedVariant {
        self.strider.speed()
    }
}

#[async_trait]
impl WalkStrategy for StraightLineWalker {
    async fn walk(
        &mut self,
        target: Coordinate,
        on_tick: Option<&mut dyn TickHook>,
        cancel: &CancelSignal,
    ) -> WalkResult<PositionAck> {
        let mut noop = NoopHook;
        let hook: &mut dyn TickHook = match on_tick {
            Some(h) => h,
            None => &mut noop,
        };

        let mut state = self.strider.begin();
        tracing::info!(from = %state.position, to = %target, "straight-line walk started");

        if let Some(ack) = self
            .strider
            .leg_or_arrive(&mut state, target, target, hook, cancel)
            .await?
        {
            return Ok(ack);
        }
        let ack = self.strider.report_final(state.position, cancel).await?;
        tracing::info!(at = %ack.position, "straight-line walk finished");
        Ok(ack)
    }
}
