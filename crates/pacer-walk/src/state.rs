//! Per-walk state.

use std::time::Duration;

use tokio::time::Instant;

use pacer_core::Coordinate;

/// State owned by exactly one in-flight walk.  Created at the start of
/// `walk` and dropped when it returns.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkState {
    /// Simulated (noise-free) position, advanced every tick.
    pub position: Coordinate,

    /// When the previous tick finished; movement per tick is
    /// `(now - last_tick_at) * speed`.
    pub last_tick_at: Instant,

    /// When a noisy position was last transmitted.
    pub last_report_at: Instant,

    /// How long after `last_report_at` the next transmission is due.
    pub report_after: Duration,
}

impl WalkState {
    pub fn new(position: Coordinate, now: Instant, report_after: Duration) -> Self {
        Self {
            position,
            last_tick_at: now,
            last_report_at: now,
            report_after,
        }
    }

    #[inline]
    pub fn report_due(&self, now: Instant) -> bool {
        now.duration_since(self.last_report_at) >= self.report_after
    }
}
