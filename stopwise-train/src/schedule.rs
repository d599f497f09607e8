// stopwise-train/src/schedule.rs

//! Flattened epoch/minibatch schedule.
//!
//! Instead of two nested loops with a shared "done" flag, the trainer walks a
//! single lazy sequence of `Step`s and breaks out of it when patience runs
//! out. The visiting order of each epoch is drawn from the sampler when the
//! epoch starts.

use stopwise_data::Sampler;

/// One training iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// 1-based epoch number.
    pub epoch: usize,
    /// 0-based position of the step within its epoch.
    pub position: usize,
    /// Minibatch visited at this step.
    pub batch_index: usize,
    /// Global iteration: `(epoch - 1) * n_batches + position`.
    pub iteration: usize,
}

/// Lazy sequence of `Step`s over at most `n_epochs` epochs.
pub struct Schedule<'s> {
    n_epochs: usize,
    n_batches: usize,
    sampler: &'s mut dyn Sampler,
    epoch: usize,
    position: usize,
    order: Option<Box<dyn Iterator<Item = usize> + Send + Sync>>,
}

impl<'s> Schedule<'s> {
    pub fn new(n_epochs: usize, n_batches: usize, sampler: &'s mut dyn Sampler) -> Self {
        Schedule {
            n_epochs,
            n_batches,
            sampler,
            epoch: 0,
            position: 0,
            order: None,
        }
    }

    pub fn n_batches(&self) -> usize {
        self.n_batches
    }

    /// Upper bound on the number of steps.
    pub fn max_steps(&self) -> usize {
        self.n_epochs * self.n_batches
    }
}

impl Iterator for Schedule<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        loop {
            // An epoch never runs past `n_batches` steps, whatever the sampler yields.
            let in_epoch = self.position < self.n_batches;
            if let Some(order) = self.order.as_mut().filter(|_| in_epoch) {
                if let Some(batch_index) = order.next() {
                    let step = Step {
                        epoch: self.epoch,
                        position: self.position,
                        batch_index,
                        iteration: (self.epoch - 1) * self.n_batches + self.position,
                    };
                    self.position += 1;
                    return Some(step);
                }
            }
            if self.epoch >= self.n_epochs || self.n_batches == 0 {
                self.order = None;
                return None;
            }
            self.epoch += 1;
            self.position = 0;
            self.order = Some(self.sampler.iter(self.n_batches));
        }
    }
}
