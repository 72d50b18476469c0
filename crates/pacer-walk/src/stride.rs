//! The tick loop shared by [`RoutedWalker`][crate::RoutedWalker] and
//! [`StraightLineWalker`][crate::StraightLineWalker].
//!
//! # One tick
//!
//! ```text
//! ① cancelled?            → abort the in-flight update, Err(Cancelled)
//! ② speed                 → refresh (variance on), clamp near target
//! ③ move                  → elapsed × speed toward the aim point
//! ④ report (when due)     → noisy position, join previous (racing cancel), spawn update
//! ⑤ hook                  → caller's per-tick work, awaited
//! ⑥ reached aim point?    → leg done (or re-aim at the target)
//! ⑦ pace                  → sleep, racing the cancel signal
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use pacer_core::{Coordinate, MAX_REPORT_INTERVAL_SECS, WalkRng, WalkSettings};

use crate::{
    CancelSignal, EventDispatcher, NetworkResult, NoiseInjector, PositionAck, PositionClient,
    SpeedVariant, TickHook, WalkError, WalkEvent, WalkResult, WalkState, kmh_to_mps,
};

/// Distance at which a waypoint counts as reached.
pub const WAYPOINT_REACHED_M: f64 = 3.0;
/// Inside this distance of the target the speed is capped.
pub const NEAR_DESTINATION_M: f64 = 40.0;
/// The cap applied near the target.
pub const SLOW_APPROACH_KMH: f64 = 10.0;
/// A leg that starts closer to the target than a draw from this range
/// ends the walk on the spot.
pub const ARRIVAL_THRESHOLD_M: (f64, f64) = (20.0, 40.0);
/// Per-leg slack: an intermediate waypoint reached this close to the
/// target is not a stopping point.
pub const TARGET_SLACK_M: (f64, f64) = (5.0, 30.0);

pub(crate) struct Strider {
    client:   Arc<dyn PositionClient>,
    events:   EventDispatcher,
    settings: WalkSettings,
    speed:    SpeedVariant,
    noise:    NoiseInjector,
    rng:      WalkRng,
    /// At most one mid-walk update in flight.
    pending:  Option<JoinHandle<NetworkResult<PositionAck>>>,
}

impl Strider {
    pub(crate) fn new(
        client:   Arc<dyn PositionClient>,
        events:   EventDispatcher,
        settings: WalkSettings,
        rng:      WalkRng,
    ) -> Self {
        Self {
            client,
            events,
            speed: SpeedVariant::new(settings.speed_variant()),
            settings,
            noise: NoiseInjector::default(),
            rng,
            pending: None,
        }
    }

    pub(crate) fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub(crate) fn speed(&self) -> &SpeedVariant {
        &self.speed
    }

    /// Fresh per-walk state at the client's current position.
    pub(crate) fn begin(&mut self) -> WalkState {
        let report_after = self.draw_report_interval();
        WalkState::new(self.client.current_position(), Instant::now(), report_after)
    }

    /// Walk one leg toward `waypoint`, unless the walk is already close
    /// enough to `target` to stop.  Returns `Some(ack)` when it stopped.
    pub(crate) async fn leg_or_arrive(
        &mut self,
        state:    &mut WalkState,
        waypoint: Coordinate,
        target:   Coordinate,
        hook:     &mut dyn TickHook,
        cancel:   &CancelSignal,
    ) -> WalkResult<Option<PositionAck>> {
        self.speed.ensure_initialized();
        if self.speed.config().use_variant {
            self.speed.major(Instant::now(), &mut self.rng, &self.events);
        }

        let remaining = state.position.distance_to(&target);
        let threshold = self.rng.gen_range(ARRIVAL_THRESHOLD_M.0..ARRIVAL_THRESHOLD_M.1);
        if remaining < threshold {
            tracing::debug!(remaining_m = remaining, threshold_m = threshold, "close enough to target");
            return self.report_final(state.position, cancel).await.map(Some);
        }

        self.leg(state, waypoint, target, hook, cancel).await?;
        Ok(None)
    }

    async fn leg(
        &mut self,
        state:    &mut WalkState,
        waypoint: Coordinate,
        target:   Coordinate,
        hook:     &mut dyn TickHook,
        cancel:   &CancelSignal,
    ) -> WalkResult<()> {
        let slack = self.rng.gen_range(TARGET_SLACK_M.0..TARGET_SLACK_M.1);
        let mut aim = waypoint;
        tracing::debug!(from = %state.position, to = %waypoint, "leg started");

        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled());
            }

            let now = Instant::now();
            let elapsed = now.duration_since(state.last_tick_at);

            let mut speed_kmh = if self.speed.config().use_variant {
                self.speed.refresh(now, &mut self.rng, &self.events)
            } else {
                self.speed.ensure_initialized()
            };
            if state.position.distance_to(&target) < NEAR_DESTINATION_M {
                speed_kmh = speed_kmh.min(SLOW_APPROACH_KMH);
            }

            let step = (elapsed.as_secs_f64() * kmh_to_mps(speed_kmh.max(0.0)))
                .min(state.position.distance_to(&aim));
            let bearing = state.position.bearing_to(&aim);
            state.position = state.position.project(step, bearing);
            self.events.send(WalkEvent::Moved { position: state.position });

            if state.report_due(now) {
                let noisy = self.noise.noisy(state.position, bearing, &mut self.rng);
                self.transmit(noisy, cancel).await?;
                state.last_report_at = now;
                state.report_after = self.draw_report_interval();
                self.events.send(WalkEvent::ImpreciseLocation { position: noisy });
            }

            hook.on_tick(state.position).await;
            state.last_tick_at = now;

            if state.position.distance_to(&aim) < WAYPOINT_REACHED_M {
                if aim != target && state.position.distance_to(&target) <= slack {
                    aim = target;
                } else {
                    return Ok(());
                }
            }

            let pace = self.settings.tick_pace();
            if pace.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(pace) => {}
                    _ = cancel.cancelled() => return Err(self.cancelled()),
                }
            }
        }
    }

    /// Join any in-flight update, then send `position` and await the ack.
    pub(crate) async fn report_final(
        &mut self,
        position: Coordinate,
        cancel:   &CancelSignal,
    ) -> WalkResult<PositionAck> {
        if cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        self.join_pending(cancel).await?;
        if cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        let request = self
            .client
            .update_player_location(position.latitude, position.longitude, position.altitude);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(self.cancelled()),
            ack = request => Ok(ack?),
        }
    }

    /// Issue a mid-walk update without waiting for its answer.
    async fn transmit(&mut self, position: Coordinate, cancel: &CancelSignal) -> WalkResult<()> {
        self.join_pending(cancel).await?;
        if cancel.is_cancelled() {
            return Err(self.cancelled());
        }
        let request = self
            .client
            .update_player_location(position.latitude, position.longitude, position.altitude);
        self.pending = Some(tokio::spawn(request));
        Ok(())
    }

    /// Wait for the in-flight update, giving up as soon as `cancel` fires.
    async fn join_pending(&mut self, cancel: &CancelSignal) -> WalkResult<Option<PositionAck>> {
        let Some(mut handle) = self.pending.take() else {
            return Ok(None);
        };
        let abort = handle.abort_handle();
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                abort.abort();
                return Err(self.cancelled());
            }
            joined = &mut handle => joined,
        };
        match joined {
            Ok(result) => Ok(Some(result?)),
            Err(e) => Err(WalkError::Join(e.to_string())),
        }
    }

    fn cancelled(&mut self) -> WalkError {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        tracing::info!("walk cancelled");
        WalkError::Cancelled
    }

    fn draw_report_interval(&mut self) -> Duration {
        let secs = self.rng.uniform(
            self.settings.report_interval_min_secs,
            self.settings.report_interval_max_secs,
        );
        let cap = Duration::from_secs_f64(MAX_REPORT_INTERVAL_SECS);
        match Duration::try_from_secs_f64(secs) {
            Ok(interval) if interval <= cap => interval,
            _ => {
                tracing::warn!(secs, "report interval out of range, using the maximum");
                cap
            }
        }
    }
}
