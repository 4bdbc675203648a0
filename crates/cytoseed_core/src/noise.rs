use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Seeded Gaussian noise shared by every seeding call of an environment.
///
/// Each call to [`NoiseSource::gaussian`] consumes exactly one standard
/// normal sample, also when the deviation is zero, so the stream position
/// only depends on the number of draws.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    rng: ChaCha8Rng,
    seed: Option<u64>,
}

impl NoiseSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            seed: None,
        }
    }

    /// Seed this source was created from, `None` for entropy-seeded sources.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            tracing::warn!(std_dev, "Invalid noise deviation, returning mean");
            return mean;
        }
        mean + std_dev * z
    }
}
