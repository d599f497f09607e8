use crate::error::StopwiseError;
use crate::matrix::Matrix;
use crate::nn::activation::Activation;
use crate::nn::init::{glorot_uniform, zero_bias};
use crate::params::ParamStore;
use rand::Rng;

/// A fully connected layer `activation(input @ W + b)`.
///
/// The layer only remembers the names of its parameters; values live in the
/// `ParamStore` it was built into.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenLayer {
    weight: String,
    bias: String,
    n_in: usize,
    n_out: usize,
    activation: Activation,
}

/// Gradients of a `HiddenLayer` for one batch.
#[derive(Debug, Clone)]
pub struct HiddenGrads {
    pub weight: Matrix,
    pub bias: Matrix,
    /// Gradient with respect to the layer input.
    pub input: Matrix,
}

/// Builder for `HiddenLayer`.
///
/// Weights and bias are optional: when absent, `W` is drawn with
/// `glorot_uniform` and `b` starts at zero.
#[derive(Debug, Clone)]
pub struct HiddenLayerBuilder {
    n_in: usize,
    n_out: usize,
    prefix: String,
    weight: Option<Matrix>,
    bias: Option<Matrix>,
    activation: Activation,
}

impl HiddenLayerBuilder {
    /// Starts a builder for a layer with `n_in` inputs and `n_out` units.
    pub fn new(n_in: usize, n_out: usize) -> Self {
        HiddenLayerBuilder {
            n_in,
            n_out,
            prefix: "hidden".to_string(),
            weight: None,
            bias: None,
            activation: Activation::Tanh,
        }
    }

    /// Name prefix of the registered parameters (`<prefix>.W`, `<prefix>.b`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn weight(mut self, weight: Matrix) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn bias(mut self, bias: Matrix) -> Self {
        self.bias = Some(bias);
        self
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Registers the parameters in `store` and returns the layer.
    ///
    /// `rng` is only consumed when no explicit weight was supplied.
    ///
    /// # Errors
    /// * `ShapeMismatch` if a supplied weight is not `[n_in, n_out]` or a
    ///   supplied bias is not `[1, n_out]`.
    /// * `DuplicateParameter` if the prefix is already used in `store`.
    pub fn build<R: Rng + ?Sized>(
        self,
        rng: &mut R,
        store: &mut ParamStore,
    ) -> Result<HiddenLayer, StopwiseError> {
        let weight = match self.weight {
            Some(w) => {
                if w.shape() != [self.n_in, self.n_out] {
                    return Err(StopwiseError::ShapeMismatch {
                        expected: vec![self.n_in, self.n_out],
                        actual: w.shape().to_vec(),
                        operation: "HiddenLayerBuilder::build (weight)".to_string(),
                    });
                }
                w
            }
            None => {
                log::debug!(
                    "Initialising {}.W [{}, {}] with glorot_uniform ({:?})",
                    self.prefix,
                    self.n_in,
                    self.n_out,
                    self.activation
                );
                glorot_uniform(rng, self.n_in, self.n_out, self.activation)?
            }
        };
        let bias = match self.bias {
            Some(b) => {
                if b.shape() != [1, self.n_out] {
                    return Err(StopwiseError::ShapeMismatch {
                        expected: vec![1, self.n_out],
                        actual: b.shape().to_vec(),
                        operation: "HiddenLayerBuilder::build (bias)".to_string(),
                    });
                }
                b
            }
            None => zero_bias(self.n_out),
        };

        let weight_name = format!("{}.W", self.prefix);
        let bias_name = format!("{}.b", self.prefix);
        if store.contains(&bias_name) {
            return Err(StopwiseError::DuplicateParameter(bias_name));
        }
        store.register(weight_name.clone(), weight)?;
        store.register(bias_name.clone(), bias)?;

        Ok(HiddenLayer {
            weight: weight_name,
            bias: bias_name,
            n_in: self.n_in,
            n_out: self.n_out,
            activation: self.activation,
        })
    }
}

impl HiddenLayer {
    pub fn n_in(&self) -> usize {
        self.n_in
    }

    pub fn n_out(&self) -> usize {
        self.n_out
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn weight_name(&self) -> &str {
        &self.weight
    }

    pub fn bias_name(&self) -> &str {
        &self.bias
    }

    /// Computes `activation(input @ W + b)` for a `[batch, n_in]` input.
    pub fn forward(&self, store: &ParamStore, input: &Matrix) -> Result<Matrix, StopwiseError> {
        let w = store.get(&self.weight)?;
        let b = store.get(&self.bias)?;
        let linear = input.matmul(w)?.add_row_vector(b)?;
        Ok(self.activation.forward(&linear))
    }

    /// Backpropagates `grad_output` through the layer.
    ///
    /// # Arguments
    /// * `input`: The input the forward pass was run on.
    /// * `output`: The forward pass result for `input`.
    /// * `grad_output`: Gradient of the loss with respect to `output`.
    pub fn backward(
        &self,
        store: &ParamStore,
        input: &Matrix,
        output: &Matrix,
        grad_output: &Matrix,
    ) -> Result<HiddenGrads, StopwiseError> {
        let activation = self.activation;
        let local = output.map(|y| activation.derivative_from_output(y));
        let grad_linear = grad_output.hadamard(&local)?;
        let w = store.get(&self.weight)?;
        Ok(HiddenGrads {
            weight: input.transpose().matmul(&grad_linear)?,
            bias: grad_linear.column_sums(),
            input: grad_linear.matmul(&w.transpose())?,
        })
    }
}

#[cfg(test)]
#[path = "hidden_test.rs"]
mod tests;
