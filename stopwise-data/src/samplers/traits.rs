// stopwise-data/src/samplers/traits.rs

use std::fmt::Debug;

/// Decides the order in which the minibatches of an epoch are visited.
///
/// The trainer asks for a fresh order at the start of every epoch, so a
/// stateful sampler may return a different permutation each time.
pub trait Sampler: Debug + Send + Sync {
    /// Returns an iterator over minibatch indices for one epoch.
    ///
    /// # Arguments
    ///
    /// * `n_batches` - The number of minibatches in the split.
    fn iter(&mut self, n_batches: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync>;

    /// Returns the number of indices one call to `iter` yields.
    fn len(&self, n_batches: usize) -> usize;
}
