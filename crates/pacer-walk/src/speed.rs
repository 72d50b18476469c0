//! Humanized walking speed.
//!
//! # Two regimes
//!
//! - **Minor**: small continuous jitter.  On about half of the calls the
//!   speed is nudged up or down by 0.01–0.09 km/h, clamped to
//!   `baseline ± (variance + 0.5)`.
//! - **Major**: scheduled drift.  Every 2–6 minutes a fresh speed is drawn
//!   uniformly from `baseline ± variance`.
//!
//! Neither regime goes below [`MIN_SPEED_KMH`].
//!
//! [`SpeedVariant::refresh`] picks the regime per tick: minor while the
//! current speed is below the baseline, major otherwise.
//!
//! The current speed lives as long as the `SpeedVariant` (one per walker),
//! so it carries over from one walk to the next.  It is initialized from
//! the baseline only while it is not positive.

use std::time::Duration;

use tokio::time::Instant;

use pacer_core::{SpeedVariantConfig, WalkRng};

use crate::{EventDispatcher, WalkEvent};

const MINOR_STEP_KMH: (f64, f64) = (0.01, 0.09);
const MINOR_SLACK_KMH: f64 = 0.5;
const MAJOR_INTERVAL_MINUTES: (f64, f64) = (2.0, 6.0);

/// Slowest speed either regime produces.
pub const MIN_SPEED_KMH: f64 = 0.1;

/// km/h → m/s.
#[inline]
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Speed state for one walker.
#[derive(Debug, Clone)]
pub struct SpeedVariant {
    config:         SpeedVariantConfig,
    current_kmh:    f64,
    last_change_at: Option<Instant>,
    next_change_at: Option<Instant>,
}

impl SpeedVariant {
    /// Speed starts unset; the first call to any regime initializes it.
    pub fn new(config: SpeedVariantConfig) -> Self {
        Self {
            config,
            current_kmh: 0.0,
            last_change_at: None,
            next_change_at: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SpeedVariantConfig {
        &self.config
    }

    #[inline]
    pub fn current_kmh(&self) -> f64 {
        self.current_kmh
    }

    #[inline]
    pub fn next_change_at(&self) -> Option<Instant> {
        self.next_change_at
    }

    #[inline]
    pub fn last_change_at(&self) -> Option<Instant> {
        self.last_change_at
    }

    /// Set the speed to the baseline if it has never been set.
    pub fn ensure_initialized(&mut self) -> f64 {
        if self.current_kmh <= 0.0 {
            self.current_kmh = self.config.baseline_kmh;
        }
        self.current_kmh
    }

    /// `[min, max]` the minor regime clamps to.
    pub fn minor_bounds(&self) -> (f64, f64) {
        let c = &self.config;
        let spread = c.variance_kmh.max(0.0) + MINOR_SLACK_KMH;
        let max = c.baseline_kmh + spread;
        let min = (c.baseline_kmh - spread).max(MIN_SPEED_KMH);
        (min.min(max), max)
    }

    /// Small random nudge.  Emits `SpeedChanged` only if the value moved.
    pub fn minor(&mut self, rng: &mut WalkRng, events: &EventDispatcher) -> f64 {
        self.ensure_initialized();
        if !rng.gen_bool(0.5) {
            return self.current_kmh;
        }

        let old = self.current_kmh;
        let (min, max) = self.minor_bounds();
        let step = rng.gen_range(MINOR_STEP_KMH.0..MINOR_STEP_KMH.1);
        self.current_kmh = if rng.gen_bool(0.5) {
            (old + step).min(max)
        } else {
            (old - step).max(min)
        };

        if self.current_kmh != old {
            events.send(WalkEvent::SpeedChanged { old_kmh: old, new_kmh: self.current_kmh });
        }
        self.current_kmh
    }

    /// Scheduled drift.  The first call resets to the baseline and
    /// schedules the first change; later calls draw a new speed only once
    /// `now` has passed the scheduled instant.
    pub fn major(&mut self, now: Instant, rng: &mut WalkRng, events: &EventDispatcher) -> f64 {
        match self.next_change_at {
            None => {
                self.current_kmh = self.config.baseline_kmh;
                self.schedule(now, rng);
            }
            Some(next) if now > next => {
                let old = self.current_kmh;
                let c = &self.config;
                let spread = c.variance_kmh.max(0.0);
                self.current_kmh = rng
                    .gen_range(c.baseline_kmh - spread..=c.baseline_kmh + spread)
                    .max(MIN_SPEED_KMH);
                self.schedule(now, rng);
                tracing::debug!(old_kmh = old, new_kmh = self.current_kmh, "walking speed drifted");
                events.send(WalkEvent::SpeedChanged { old_kmh: old, new_kmh: self.current_kmh });
            }
            Some(_) => {}
        }
        self.current_kmh
    }

    /// Per-tick refresh: minor while below baseline, major otherwise.
    pub fn refresh(&mut self, now: Instant, rng: &mut WalkRng, events: &EventDispatcher) -> f64 {
        if self.ensure_initialized() < self.config.baseline_kmh {
            self.minor(rng, events)
        } else {
            self.major(now, rng, events)
        }
    }

    fn schedule(&mut self, now: Instant, rng: &mut WalkRng) {
        let minutes = rng.gen_range(MAJOR_INTERVAL_MINUTES.0..MAJOR_INTERVAL_MINUTES.1);
        self.last_change_at = Some(now);
        self.next_change_at = Some(now + Duration::from_secs_f64(minutes * 60.0));
    }
}
