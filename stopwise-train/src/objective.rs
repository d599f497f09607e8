// stopwise-train/src/objective.rs

use stopwise_core::{ParamStore, StopwiseError};
use stopwise_data::Minibatch;

/// Result of one training step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    /// Training cost of the minibatch before the update.
    pub loss: f64,
    /// Class predictions for the minibatch, when the objective computes them.
    pub predictions: Option<Vec<usize>>,
}

impl StepOutput {
    pub fn new(loss: f64) -> Self {
        StepOutput { loss, predictions: None }
    }
}

/// The numerical side of training, as seen by the `Trainer`.
///
/// Errors are passed through the trainer untouched: `fit` returns
/// `Self::Error`. Trainer-side failures (bad configuration, bad data)
/// are converted from `StopwiseError`.
pub trait Objective {
    type Error: From<StopwiseError>;

    /// Updates `params` with one gradient step on `batch`.
    fn train_step(
        &mut self,
        params: &mut ParamStore,
        batch: &Minibatch<'_>,
    ) -> Result<StepOutput, Self::Error>;

    /// Error rate of the current parameters on `batch`, in `[0, 1]`.
    ///
    /// Takes the parameters by shared reference: evaluating never changes
    /// them.
    fn evaluate(&self, params: &ParamStore, batch: &Minibatch<'_>) -> Result<f64, Self::Error>;
}
