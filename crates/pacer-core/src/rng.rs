//! Injectable random source for walk humanization.
//!
//! Every random draw the walk engine makes (speed drift, noise bearing,
//! arrival thresholds, report intervals) goes through a `WalkRng` handed to
//! the walker at construction.  Tests seed it with `WalkRng::new(seed)` and
//! get a reproducible walk; production code uses `from_entropy()`.
//!
//! Child streams are derived with `child(offset)`:
//!
//!   seed = parent.next_u64() XOR (offset * MIXING_CONSTANT)
//!
//! so a fallback walker seeded from its engine never shares state with it.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seedable RNG owned by one walker.
///
/// Not `Sync`: a walker is driven by one task at a time and the RNG moves
/// with it.
#[derive(Debug, Clone)]
pub struct WalkRng(SmallRng);

impl WalkRng {
    /// Deterministic stream from `seed`.
    pub fn new(seed: u64) -> Self {
        WalkRng(SmallRng::seed_from_u64(seed))
    }

    /// Non-deterministic stream seeded from the operating system.
    pub fn from_entropy() -> Self {
        WalkRng(SmallRng::from_entropy())
    }

    /// Derive an independent child stream.
    pub fn child(&mut self, offset: u64) -> WalkRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        WalkRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform draw in `[low, high)`; returns `low` when the range is empty
    /// or either bound is not finite.
    #[inline]
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low && (high - low).is_finite() { self.0.gen_range(low..high) } else { low }
    }
}
