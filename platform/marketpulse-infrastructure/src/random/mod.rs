use marketpulse_domain::repositories::random_source::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `StdRng`-backed draws. Seeded from OS entropy unless a fixed seed is given.
#[derive(Debug, Clone)]
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}
