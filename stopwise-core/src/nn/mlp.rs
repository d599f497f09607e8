use crate::error::StopwiseError;
use crate::matrix::Matrix;
use crate::nn::activation::Activation;
use crate::nn::layers::hidden::{HiddenLayer, HiddenLayerBuilder};
use crate::nn::layers::logistic::{check_labels, LogisticRegression};
use crate::params::{Gradients, ParamStore};
use rand::Rng;

/// Weights of the L1 and squared-L2 penalties added to the cost.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Regularization {
    pub l1: f32,
    pub l2: f32,
}

impl Regularization {
    pub fn new(l1: f32, l2: f32) -> Self {
        Regularization { l1, l2 }
    }

    /// `l1 * sum|w| + l2 * sum(w^2)` for one weight matrix.
    pub fn penalty(&self, weight: &Matrix) -> f32 {
        self.l1 * weight.abs_sum() + self.l2 * weight.squared_sum()
    }

    /// Adds the penalty gradient `l1 * sign(w) + 2 * l2 * w` to `grad`.
    pub fn add_gradient(&self, weight: &Matrix, grad: &mut Matrix) -> Result<(), StopwiseError> {
        if self.l1 != 0.0 {
            grad.add_scaled_(self.l1, &weight.map(sign))?;
        }
        if self.l2 != 0.0 {
            grad.add_scaled_(2.0 * self.l2, weight)?;
        }
        Ok(())
    }
}

/// A one-hidden-layer perceptron: `HiddenLayer` feeding a `LogisticRegression`.
///
/// Only the weight matrices (not the biases) are penalised by the
/// regularisation terms.
#[derive(Debug, Clone, PartialEq)]
pub struct Mlp {
    hidden: HiddenLayer,
    output: LogisticRegression,
}

impl Mlp {
    /// Builds a tanh MLP, registering `hidden.*` and `output.*` in `store`.
    ///
    /// # Arguments
    /// * `rng`: Random source for the hidden weights.
    /// * `store`: Store receiving the parameters.
    /// * `n_in`: Dimensionality of the inputs.
    /// * `n_hidden`: Number of hidden units.
    /// * `n_out`: Number of classes.
    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        store: &mut ParamStore,
        n_in: usize,
        n_hidden: usize,
        n_out: usize,
    ) -> Result<Self, StopwiseError> {
        let hidden = HiddenLayerBuilder::new(n_in, n_hidden)
            .prefix("hidden")
            .activation(Activation::Tanh)
            .build(rng, store)?;
        let output = LogisticRegression::new(store, "output", n_hidden, n_out)?;
        Ok(Mlp { hidden, output })
    }

    /// Assembles an MLP from layers already registered in a store.
    pub fn from_layers(hidden: HiddenLayer, output: LogisticRegression) -> Result<Self, StopwiseError> {
        if hidden.n_out() != output.n_in() {
            return Err(StopwiseError::ShapeMismatch {
                expected: vec![hidden.n_out()],
                actual: vec![output.n_in()],
                operation: "Mlp::from_layers".to_string(),
            });
        }
        Ok(Mlp { hidden, output })
    }

    pub fn hidden(&self) -> &HiddenLayer {
        &self.hidden
    }

    pub fn output(&self) -> &LogisticRegression {
        &self.output
    }

    /// Names of every parameter of the model, hidden layer first.
    pub fn param_names(&self) -> Vec<&str> {
        vec![
            self.hidden.weight_name(),
            self.hidden.bias_name(),
            self.output.weight_name(),
            self.output.bias_name(),
        ]
    }

    /// `|W_hidden|_1 + |W_output|_1`
    pub fn l1(&self, store: &ParamStore) -> Result<f32, StopwiseError> {
        Ok(store.get(self.hidden.weight_name())?.abs_sum() + store.get(self.output.weight_name())?.abs_sum())
    }

    /// `|W_hidden|_2^2 + |W_output|_2^2`
    pub fn l2_sqr(&self, store: &ParamStore) -> Result<f32, StopwiseError> {
        Ok(store.get(self.hidden.weight_name())?.squared_sum()
            + store.get(self.output.weight_name())?.squared_sum())
    }

    /// Class probabilities for a `[batch, n_in]` input.
    pub fn forward(&self, store: &ParamStore, input: &Matrix) -> Result<Matrix, StopwiseError> {
        let h = self.hidden.forward(store, input)?;
        self.output.p_y_given_x(store, &h)
    }

    pub fn predict(&self, store: &ParamStore, input: &Matrix) -> Result<Vec<usize>, StopwiseError> {
        Ok(self.forward(store, input)?.argmax_rows())
    }

    pub fn negative_log_likelihood(
        &self,
        store: &ParamStore,
        input: &Matrix,
        labels: &[usize],
    ) -> Result<f32, StopwiseError> {
        let h = self.hidden.forward(store, input)?;
        self.output.negative_log_likelihood(store, &h, labels)
    }

    /// Regularised training cost: `nll + l1 * L1 + l2 * L2_sqr`.
    pub fn cost(
        &self,
        store: &ParamStore,
        input: &Matrix,
        labels: &[usize],
        reg: Regularization,
    ) -> Result<f32, StopwiseError> {
        let nll = self.negative_log_likelihood(store, input, labels)?;
        Ok(nll + reg.l1 * self.l1(store)? + reg.l2 * self.l2_sqr(store)?)
    }

    /// Fraction of misclassified examples in the batch.
    pub fn errors(&self, store: &ParamStore, input: &Matrix, labels: &[usize]) -> Result<f32, StopwiseError> {
        let h = self.hidden.forward(store, input)?;
        self.output.errors(store, &h, labels)
    }

    /// Returns the regularised cost and its gradient for every parameter.
    pub fn gradients(
        &self,
        store: &ParamStore,
        input: &Matrix,
        labels: &[usize],
        reg: Regularization,
    ) -> Result<(f32, Gradients), StopwiseError> {
        check_labels(labels, input.rows(), self.output.n_out())?;
        let h = self.hidden.forward(store, input)?;
        let out = self.output.gradients(store, &h, labels)?;
        let hid = self.hidden.backward(store, input, &h, &out.input)?;

        let mut grads = Gradients::new();
        let penalised = |name: &str, grad: Matrix| -> Result<Matrix, StopwiseError> {
            let mut g = grad;
            reg.add_gradient(store.get(name)?, &mut g)?;
            Ok(g)
        };
        let w_hidden = penalised(self.hidden.weight_name(), hid.weight)?;
        let w_output = penalised(self.output.weight_name(), out.weight)?;
        grads.insert(self.hidden.weight_name().to_string(), w_hidden);
        grads.insert(self.hidden.bias_name().to_string(), hid.bias);
        grads.insert(self.output.weight_name().to_string(), w_output);
        grads.insert(self.output.bias_name().to_string(), out.bias);

        let cost = out.nll + reg.l1 * self.l1(store)? + reg.l2 * self.l2_sqr(store)?;
        if !cost.is_finite() {
            return Err(StopwiseError::NonFiniteValue { operation: "Mlp::gradients".to_string() });
        }
        Ok((cost, grads))
    }
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "mlp_test.rs"]
mod tests;
