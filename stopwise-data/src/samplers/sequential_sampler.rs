// stopwise-data/src/samplers/sequential_sampler.rs

use super::traits::Sampler;

/// Visits minibatches in index order, every epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn iter(&mut self, n_batches: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new(0..n_batches)
    }

    fn len(&self, n_batches: usize) -> usize {
        n_batches
    }
}

#[cfg(test)]
#[path = "sequential_sampler_test.rs"]
mod tests;
