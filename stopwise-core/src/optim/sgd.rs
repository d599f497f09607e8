use crate::error::StopwiseError;
use crate::matrix::Matrix;
use crate::optim::UpdateRule;
use crate::params::{Gradients, ParamStore, Updates};
use std::collections::HashMap;

/// Implements the Stochastic Gradient Descent (SGD) update rule.
///
/// Without momentum every parameter becomes `param - lr * grad`. With
/// momentum `mu` a velocity `v = mu * v + grad` is kept per parameter name and
/// the update is `param - lr * v`.
#[derive(Debug, Clone)]
pub struct Sgd {
    learning_rate: f32,
    momentum: f32,
    velocity: HashMap<String, Matrix>,
}

impl Sgd {
    /// Creates a plain SGD rule.
    ///
    /// # Errors
    /// Returns `ConfigurationError` unless `learning_rate` is finite and positive.
    pub fn new(learning_rate: f32) -> Result<Self, StopwiseError> {
        Self::with_momentum(learning_rate, 0.0)
    }

    /// Creates an SGD rule with momentum in `[0, 1)`.
    pub fn with_momentum(learning_rate: f32, momentum: f32) -> Result<Self, StopwiseError> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "learning rate must be finite and positive, got {}",
                learning_rate
            )));
        }
        if !(0.0..1.0).contains(&momentum) {
            return Err(StopwiseError::ConfigurationError(format!(
                "momentum must be in [0, 1), got {}",
                momentum
            )));
        }
        Ok(Sgd {
            learning_rate,
            momentum,
            velocity: HashMap::new(),
        })
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f32) {
        self.learning_rate = learning_rate;
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }

    /// Drops the momentum buffers.
    pub fn reset(&mut self) {
        self.velocity.clear();
    }
}

impl Sgd {
    // Computes the updates and the next momentum buffers without touching `self`.
    fn pending(
        &self,
        params: &ParamStore,
        grads: &Gradients,
    ) -> Result<(Updates, Vec<(String, Matrix)>), StopwiseError> {
        let mut updates = Vec::with_capacity(grads.len());
        let mut velocity = Vec::new();
        for (name, grad) in grads {
            let current = params.get(name)?;
            let direction = if self.momentum != 0.0 {
                let mut next = match self.velocity.get(name) {
                    Some(v) => v.scale(self.momentum),
                    None => Matrix::zeros(grad.rows(), grad.cols()),
                };
                next.add_scaled_(1.0, grad)?;
                velocity.push((name.clone(), next.clone()));
                next
            } else {
                grad.clone()
            };
            let mut new_value = current.clone();
            new_value.add_scaled_(-self.learning_rate, &direction)?;
            updates.push((name.clone(), new_value));
        }
        Ok((updates, velocity))
    }
}

impl UpdateRule for Sgd {
    fn updates(&mut self, params: &ParamStore, grads: &Gradients) -> Result<Updates, StopwiseError> {
        let (updates, velocity) = self.pending(params, grads)?;
        self.velocity.extend(velocity);
        Ok(updates)
    }

    /// Momentum buffers only advance once the store accepted the updates.
    fn step(&mut self, params: &mut ParamStore, grads: &Gradients) -> Result<(), StopwiseError> {
        let (updates, velocity) = self.pending(params, grads)?;
        params.apply_updates(updates)?;
        self.velocity.extend(velocity);
        Ok(())
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
