// stopwise-train/src/objectives.rs

//! `Objective` adapters for the models in `stopwise_core::nn`.

use crate::objective::{Objective, StepOutput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use stopwise_core::nn::{LogisticRegression, Mlp, Regularization};
use stopwise_core::optim::{Sgd, UpdateRule};
use stopwise_core::{Gradients, Matrix, ParamStore, StopwiseError};
use stopwise_data::Minibatch;

/// Model and optimiser settings of an `MlpObjective`.
#[derive(Debug, Clone, PartialEq)]
pub struct MlpConfig {
    pub learning_rate: f32,
    pub momentum: f32,
    pub l1_reg: f32,
    pub l2_reg: f32,
    pub n_hidden: usize,
    /// Seed of the hidden-layer initialisation.
    pub seed: u64,
}

impl Default for MlpConfig {
    fn default() -> Self {
        MlpConfig {
            learning_rate: 0.01,
            momentum: 0.0,
            l1_reg: 0.0,
            l2_reg: 0.0001,
            n_hidden: 500,
            seed: 1234,
        }
    }
}

impl MlpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn with_regularization(mut self, l1_reg: f32, l2_reg: f32) -> Self {
        self.l1_reg = l1_reg;
        self.l2_reg = l2_reg;
        self
    }

    pub fn with_hidden(mut self, n_hidden: usize) -> Self {
        self.n_hidden = n_hidden;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// # Errors
    ///
    /// Returns `StopwiseError::ConfigurationError` for a zero hidden width or
    /// negative or non-finite penalty weights. The learning rate and momentum
    /// are checked by `Sgd`.
    pub fn validate(&self) -> Result<(), StopwiseError> {
        if self.n_hidden == 0 {
            return Err(StopwiseError::ConfigurationError(
                "n_hidden must be at least 1".to_string(),
            ));
        }
        for (name, value) in [("l1_reg", self.l1_reg), ("l2_reg", self.l2_reg)] {
            if !value.is_finite() || value < 0.0 {
                return Err(StopwiseError::ConfigurationError(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Trains an `Mlp` with SGD on the regularised negative log-likelihood and
/// evaluates it by its error rate.
#[derive(Debug, Clone)]
pub struct MlpObjective {
    mlp: Mlp,
    sgd: Sgd,
    reg: Regularization,
    record_predictions: bool,
}

impl MlpObjective {
    pub fn new(mlp: Mlp, sgd: Sgd, reg: Regularization) -> Self {
        MlpObjective {
            mlp,
            sgd,
            reg,
            record_predictions: false,
        }
    }

    /// Builds a fresh `n_in -> n_hidden -> n_out` MLP into `params`.
    pub fn build(
        config: &MlpConfig,
        params: &mut ParamStore,
        n_in: usize,
        n_out: usize,
    ) -> Result<Self, StopwiseError> {
        config.validate()?;
        let sgd = Sgd::with_momentum(config.learning_rate, config.momentum)?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mlp = Mlp::new(&mut rng, params, n_in, config.n_hidden, n_out)?;
        Ok(Self::new(mlp, sgd, Regularization::new(config.l1_reg, config.l2_reg)))
    }

    /// Also return the pre-update class predictions from every `train_step`.
    pub fn with_predictions(mut self, record: bool) -> Self {
        self.record_predictions = record;
        self
    }

    pub fn mlp(&self) -> &Mlp {
        &self.mlp
    }

    pub fn regularization(&self) -> Regularization {
        self.reg
    }
}

impl Objective for MlpObjective {
    type Error = StopwiseError;

    fn train_step(&mut self, params: &mut ParamStore, batch: &Minibatch<'_>) -> Result<StepOutput, StopwiseError> {
        let x = batch.inputs()?;
        let predictions = if self.record_predictions {
            Some(self.mlp.predict(params, &x)?)
        } else {
            None
        };
        let (cost, grads) = self.mlp.gradients(params, &x, batch.labels, self.reg)?;
        self.sgd.step(params, &grads)?;
        Ok(StepOutput {
            loss: f64::from(cost),
            predictions,
        })
    }

    fn evaluate(&self, params: &ParamStore, batch: &Minibatch<'_>) -> Result<f64, StopwiseError> {
        let x = batch.inputs()?;
        Ok(f64::from(self.mlp.errors(params, &x, batch.labels)?))
    }
}

/// Trains a `LogisticRegression` with plain SGD on the negative
/// log-likelihood plus an optional weight penalty.
#[derive(Debug, Clone)]
pub struct LogisticObjective {
    model: LogisticRegression,
    sgd: Sgd,
    reg: Regularization,
    record_predictions: bool,
}

impl LogisticObjective {
    pub fn new(model: LogisticRegression, sgd: Sgd) -> Self {
        LogisticObjective {
            model,
            sgd,
            reg: Regularization::default(),
            record_predictions: false,
        }
    }

    /// Registers a zero-initialised `n_in -> n_out` classifier under `logreg.*`.
    pub fn build(
        params: &mut ParamStore,
        n_in: usize,
        n_out: usize,
        learning_rate: f32,
    ) -> Result<Self, StopwiseError> {
        let model = LogisticRegression::new(params, "logreg", n_in, n_out)?;
        Ok(Self::new(model, Sgd::new(learning_rate)?))
    }

    /// Penalty on the weight matrix (the bias is never penalised).
    pub fn with_regularization(mut self, reg: Regularization) -> Self {
        self.reg = reg;
        self
    }

    /// Also return the pre-update class predictions from every `train_step`.
    pub fn with_predictions(mut self, record: bool) -> Self {
        self.record_predictions = record;
        self
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    pub fn regularization(&self) -> Regularization {
        self.reg
    }

    /// Penalised training cost: `nll + reg.penalty(W)`.
    pub fn cost(&self, params: &ParamStore, input: &Matrix, labels: &[usize]) -> Result<f32, StopwiseError> {
        let nll = self.model.negative_log_likelihood(params, input, labels)?;
        Ok(nll + self.reg.penalty(params.get(self.model.weight_name())?))
    }

    /// Returns the penalised cost and its gradient for `W` and `b`.
    pub fn gradients(
        &self,
        params: &ParamStore,
        input: &Matrix,
        labels: &[usize],
    ) -> Result<(f32, Gradients), StopwiseError> {
        let g = self.model.gradients(params, input, labels)?;
        let w = params.get(self.model.weight_name())?;
        let cost = g.nll + self.reg.penalty(w);
        if !cost.is_finite() {
            return Err(StopwiseError::NonFiniteValue {
                operation: "LogisticObjective::gradients".to_string(),
            });
        }
        let mut weight = g.weight;
        self.reg.add_gradient(w, &mut weight)?;
        let mut grads = Gradients::new();
        grads.insert(self.model.weight_name().to_string(), weight);
        grads.insert(self.model.bias_name().to_string(), g.bias);
        Ok((cost, grads))
    }
}

impl Objective for LogisticObjective {
    type Error = StopwiseError;

    fn train_step(&mut self, params: &mut ParamStore, batch: &Minibatch<'_>) -> Result<StepOutput, StopwiseError> {
        let x = batch.inputs()?;
        let predictions = if self.record_predictions {
            Some(self.model.predict(params, &x)?)
        } else {
            None
        };
        let (cost, grads) = self.gradients(params, &x, batch.labels)?;
        self.sgd.step(params, &grads)?;
        Ok(StepOutput {
            loss: f64::from(cost),
            predictions,
        })
    }

    fn evaluate(&self, params: &ParamStore, batch: &Minibatch<'_>) -> Result<f64, StopwiseError> {
        let x = batch.inputs()?;
        Ok(f64::from(self.model.errors(params, &x, batch.labels)?))
    }
}

#[cfg(test)]
#[path = "objectives_test.rs"]
mod tests;
