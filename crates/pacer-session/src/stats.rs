//! Per-session walk counters.

use std::fmt;

use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct SessionStats {
    pub started_at:        Instant,
    pub walks_completed:   u64,
    pub walks_cancelled:   u64,
    pub walks_failed:      u64,
    /// Straight-line distance from each walk's start to its acknowledged
    /// end, summed.
    pub distance_walked_m: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at:        Instant::now(),
            walks_completed:   0,
            walks_cancelled:   0,
            walks_failed:      0,
            distance_walked_m: 0.0,
        }
    }

    pub fn record_completed(&mut self, distance_m: f64) {
        self.walks_completed += 1;
        self.distance_walked_m += distance_m;
    }

    pub fn record_cancelled(&mut self) {
        self.walks_cancelled += 1;
    }

    pub fn record_failed(&mut self) {
        self.walks_failed += 1;
    }

    /// Average speed over the whole session so far, in km/h.
    pub fn average_kmh(&self) -> f64 {
        let hours = self.started_at.elapsed().as_secs_f64() / 3_600.0;
        if hours > 0.0 { self.distance_walked_m / 1_000.0 / hours } else { 0.0 }
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} walks ({} cancelled, {} failed), {:.2} km at {:.1} km/h",
            self.walks_completed,
            self.walks_cancelled,
            self.walks_failed,
            self.distance_walked_m / 1_000.0,
            self.average_kmh(),
        )
    }
}
