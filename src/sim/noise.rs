//! Injectable noise source for calibration variance and sensor jitter

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the system's randomness.
///
/// Seedable so tests are deterministic; entropy-backed for production runs;
/// or disabled entirely, in which case every draw is 0.0 and calibration
/// and jitter become exact.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: Option<StdRng>,
}

impl NoiseSource {
    /// Create a deterministic source from a seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Create a source backed by OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Some(StdRng::from_entropy()),
        }
    }

    /// Create a source whose every draw is 0.0.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { rng: None }
    }

    /// Check whether draws produce noise.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.rng.is_some()
    }

    /// Draw uniformly from `[-amplitude, amplitude]`, or 0.0 when disabled.
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.gen_range(-amplitude..=amplitude),
            None => 0.0,
        }
    }

    /// Draw uniformly from the half-open range `[low, high)`, or 0.0 when
    /// disabled. Requires `low < high`.
    pub fn draw(&mut self, low: f64, high: f64) -> f64 {
        match &mut self.rng {
            Some(rng) => rng.gen_range(low..high),
            None => 0.0,
        }
    }
}
