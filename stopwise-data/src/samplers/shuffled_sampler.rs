// stopwise-data/src/samplers/shuffled_sampler.rs

use super::traits::Sampler;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Visits minibatches in a seeded random order, reshuffled each epoch.
///
/// Two samplers built with the same seed produce the same sequence of
/// permutations.
#[derive(Debug, Clone)]
pub struct ShuffledSampler {
    seed: u64,
    rng: StdRng,
}

impl ShuffledSampler {
    /// Creates a new `ShuffledSampler`.
    ///
    /// # Arguments
    ///
    /// * `seed`: Seed of the internal `StdRng`.
    pub fn new(seed: u64) -> Self {
        ShuffledSampler {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewinds the generator so the next epoch replays the first permutation.
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

impl Sampler for ShuffledSampler {
    fn iter(&mut self, n_batches: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        let mut order: Vec<usize> = (0..n_batches).collect();
        order.shuffle(&mut self.rng);
        Box::new(order.into_iter())
    }

    fn len(&self, n_batches: usize) -> usize {
        n_batches
    }
}

#[cfg(test)]
#[path = "shuffled_sampler_test.rs"]
mod tests;
