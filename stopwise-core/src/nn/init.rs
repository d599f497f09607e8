use crate::error::StopwiseError;
use crate::matrix::Matrix;
use crate::nn::activation::Activation;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

/// Draws an `[n_in, n_out]` weight matrix from the Glorot uniform distribution.
///
/// Samples come from `U(-sqrt(6 / (n_in + n_out)), sqrt(6 / (n_in + n_out)))`.
/// For `Activation::Sigmoid` the values are multiplied by 4.
///
/// The result depends only on the shape, the activation and the state of `rng`.
///
/// # Arguments
/// * `rng`: The random source to draw from.
/// * `n_in`: Fan-in of the layer.
/// * `n_out`: Fan-out of the layer.
/// * `activation`: The activation the weights will feed.
///
/// # Errors
/// Returns `StopwiseError::ConfigurationError` if `n_in` or `n_out` is zero.
pub fn glorot_uniform<R: Rng + ?Sized>(
    rng: &mut R,
    n_in: usize,
    n_out: usize,
    activation: Activation,
) -> Result<Matrix, StopwiseError> {
    if n_in == 0 || n_out == 0 {
        return Err(StopwiseError::ConfigurationError(format!(
            "glorot_uniform needs non-zero fan-in and fan-out, got [{}, {}]",
            n_in, n_out
        )));
    }
    let bound = (6.0f32 / (n_in + n_out) as f32).sqrt();
    let dist = Uniform::new(-bound, bound);
    let scale = if activation == Activation::Sigmoid { 4.0 } else { 1.0 };
    let data: Vec<f32> = (0..n_in * n_out).map(|_| dist.sample(rng) * scale).collect();
    Matrix::from_vec(data, n_in, n_out)
}

/// A `[1, n_out]` bias initialised to zero.
pub fn zero_bias(n_out: usize) -> Matrix {
    Matrix::zeros(1, n_out)
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
