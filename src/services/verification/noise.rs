// Noise sources for heuristic scoring
// Feature scores carry a small random term to emulate model noise.
// Sources are built per call so concurrent verifications never share state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

pub trait NoiseSource: Send {
    /// Next draw in [0, 1]. Random sources never return 1.0; fixed
    /// sources may.
    fn next_unit(&mut self) -> f64;

    /// Symmetric jitter in [-amplitude, amplitude].
    fn jitter(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() - 0.5) * 2.0 * amplitude
    }
}

pub struct RandomNoise {
    rng: StdRng,
}

impl RandomNoise {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl NoiseSource for RandomNoise {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always yields the same draw, clamped to [0, 1]; non-finite values read
/// as 0.5. `FixedNoise(0.5)` means zero jitter.
#[derive(Debug, Copy, Clone)]
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn next_unit(&mut self) -> f64 {
        if self.0.is_finite() {
            self.0.clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NoiseMode {
    Random,
    Seeded { seed: u64 },
    Disabled,
}

impl Default for NoiseMode {
    fn default() -> Self {
        Self::Random
    }
}

impl NoiseMode {
    pub fn source(&self) -> Box<dyn NoiseSource> {
        match *self {
            NoiseMode::Random => Box::new(RandomNoise::from_entropy()),
            NoiseMode::Seeded { seed } => Box::new(RandomNoise::seeded(seed)),
            NoiseMode::Disabled => Box::new(FixedNoise(0.5)),
        }
    }
}
