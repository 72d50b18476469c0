//! Walk configuration.
//!
//! Typically loaded from the `[walk]` table of a TOML file by the session
//! crate and handed to each walker.  Every field has a default, so an empty
//! table is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Default for walking_speed_kmh
fn default_walking_speed() -> f64 {
    4.8
}

/// Default for walking_speed_variance_kmh
fn default_walking_speed_variance() -> f64 {
    1.2
}

fn default_true() -> bool {
    true
}

fn default_tick_pace_ms() -> u64 {
    1_000
}

fn default_report_interval_min() -> f64 {
    8.0
}

fn default_report_interval_max() -> f64 {
    15.0
}

/// Longest accepted gap between position reports, in seconds.
pub const MAX_REPORT_INTERVAL_SECS: f64 = 3_600.0;

/// Baseline, variance bound, and on/off switch for humanized speed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpeedVariantConfig {
    pub baseline_kmh: f64,
    pub variance_kmh: f64,
    pub use_variant:  bool,
}

/// Settings read by the walk engine.  Read-only from the engine's side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkSettings {
    /// Baseline walking speed in km/h.
    #[serde(default = "default_walking_speed")]
    pub walking_speed_kmh: f64,

    /// How far the humanized speed may drift from the baseline, in km/h.
    #[serde(default = "default_walking_speed_variance")]
    pub walking_speed_variance_kmh: f64,

    /// Enable minor/major speed drift.  When `false` the baseline is used
    /// for the whole walk.
    #[serde(default = "default_true")]
    pub use_walking_speed_variant: bool,

    /// Real-time delay between ticks in milliseconds.  0 disables pacing.
    #[serde(default = "default_tick_pace_ms")]
    pub tick_pace_ms: u64,

    /// Lower bound of the randomized interval between imprecise position
    /// reports, in seconds.
    #[serde(default = "default_report_interval_min")]
    pub report_interval_min_secs: f64,

    /// Upper bound of the report interval.  Equal bounds give a fixed
    /// interval.
    #[serde(default = "default_report_interval_max")]
    pub report_interval_max_secs: f64,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            walking_speed_kmh:          default_walking_speed(),
            walking_speed_variance_kmh: default_walking_speed_variance(),
            use_walking_speed_variant:  default_true(),
            tick_pace_ms:               default_tick_pace_ms(),
            report_interval_min_secs:   default_report_interval_min(),
            report_interval_max_secs:   default_report_interval_max(),
        }
    }
}

impl WalkSettings {
    /// Parse and validate settings from a TOML document.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let settings: WalkSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the engine cannot honour.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.walking_speed_kmh > 0.0 && self.walking_speed_kmh.is_finite()) {
            return Err(CoreError::Config(format!(
                "walking_speed_kmh must be positive and finite, got {}",
                self.walking_speed_kmh
            )));
        }
        if !(self.walking_speed_variance_kmh >= 0.0) {
            return Err(CoreError::Config(format!(
                "walking_speed_variance_kmh must be non-negative, got {}",
                self.walking_speed_variance_kmh
            )));
        }
        if self.walking_speed_variance_kmh >= self.walking_speed_kmh {
            return Err(CoreError::Config(format!(
                "walking_speed_variance_kmh ({}) must be below walking_speed_kmh ({})",
                self.walking_speed_variance_kmh, self.walking_speed_kmh
            )));
        }
        if !(self.report_interval_min_secs >= 0.0)
            || !(self.report_interval_max_secs <= MAX_REPORT_INTERVAL_SECS)
            || self.report_interval_max_secs < self.report_interval_min_secs
        {
            return Err(CoreError::Config(format!(
                "report interval [{}, {}] must be an ordered range within [0, {}]",
                self.report_interval_min_secs, self.report_interval_max_secs, MAX_REPORT_INTERVAL_SECS
            )));
        }
        Ok(())
    }

    /// The subset of settings the speed generator needs.
    pub fn speed_variant(&self) -> SpeedVariantConfig {
        SpeedVariantConfig {
            baseline_kmh: self.walking_speed_kmh,
            variance_kmh: self.walking_speed_variance_kmh,
            use_variant:  self.use_walking_speed_variant,
        }
    }

    #[inline]
    pub fn tick_pace(&self) -> Duration {
        Duration::from_millis(self.tick_pace_ms)
    }
}
