//! Seeded draws shared by the sequencer and the builders.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

/// Uniform `f32` in `[lo, hi)`; returns `lo` for an empty or inverted range.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    lo + (hi - lo) * rng.random::<f32>()
}

/// Per-event random stream. Builders take every draw they might need in a
/// fixed order so that toggling a feature flag never shifts later draws.
pub(crate) struct Draws(Pcg64);

impl Draws {
    pub(crate) fn new(seed: u64) -> Self {
        Self(Pcg64::seed_from_u64(seed))
    }

    /// Fresh seed for a primitive.
    pub(crate) fn seed(&mut self) -> u64 {
        self.0.random()
    }

    pub(crate) fn uniform(&mut self, lo: f32, hi: f32) -> f32 {
        uniform(&mut self.0, lo, hi)
    }

    /// Integer in `0..=max`.
    pub(crate) fn up_to(&mut self, max: u32) -> u32 {
        self.0.random_range(0..=max)
    }
}
