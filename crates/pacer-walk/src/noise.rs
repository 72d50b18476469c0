//! GPS imprecision.
//!
//! Phone GPS is rarely better than a few metres.  Before a position is
//! transmitted it is moved a random distance under 3 m, in a direction
//! within 40° of the direction of travel.

use pacer_core::{Coordinate, WalkRng, normalize_bearing};

pub const MAX_NOISE_BEARING_DEG: f64 = 40.0;
pub const MAX_NOISE_DISTANCE_M: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct NoiseInjector {
    max_bearing_offset_deg: f64,
    max_distance_m:         f64,
}

impl Default for NoiseInjector {
    fn default() -> Self {
        Self {
            max_bearing_offset_deg: MAX_NOISE_BEARING_DEG,
            max_distance_m:         MAX_NOISE_DISTANCE_M,
        }
    }
}

impl NoiseInjector {
    /// Perturb `position`, assuming the avatar is heading `travel_bearing`.
    pub fn noisy(&self, position: Coordinate, travel_bearing: f64, rng: &mut WalkRng) -> Coordinate {
        let offset = rng.gen_range(-self.max_bearing_offset_deg..=self.max_bearing_offset_deg);
        let bearing = normalize_bearing(travel_bearing + offset);
        let distance = rng.gen_range(0.0..self.max_distance_m);
        position.project(distance, bearing)
    }
}
