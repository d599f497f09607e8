// stopwise-core/src/optim/mod.rs

//! Update rules turning gradients into parameter updates.

pub mod sgd;

pub use sgd::Sgd;

use crate::error::StopwiseError;
use crate::params::{Gradients, ParamStore, Updates};

/// Common interface of gradient-descent update rules.
pub trait UpdateRule {
    /// Computes the new value of every parameter that has a gradient.
    ///
    /// Implementations may advance internal state (e.g. momentum buffers).
    fn updates(&mut self, params: &ParamStore, grads: &Gradients) -> Result<Updates, StopwiseError>;

    /// Computes the updates and applies them to `params` in one transaction.
    fn step(&mut self, params: &mut ParamStore, grads: &Gradients) -> Result<(), StopwiseError> {
        let updates = self.updates(params, grads)?;
        params.apply_updates(updates)
    }
}
