use crate::matrix::Matrix;

/// Elementwise non-linearity applied by a `HiddenLayer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Relu,
    /// No non-linearity: the layer output is the affine map itself.
    Identity,
}

impl Activation {
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Relu => x.max(0.0),
            Activation::Identity => x,
        }
    }

    /// Derivative expressed through the activation output `y = f(x)`.
    pub fn derivative_from_output(self, y: f32) -> f32 {
        match self {
            Activation::Tanh => 1.0 - y * y,
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Relu => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Identity => 1.0,
        }
    }

    pub fn forward(self, input: &Matrix) -> Matrix {
        input.map(|v| self.apply(v))
    }
}

/// Row-wise softmax, shifted by the row maximum for stability.
pub fn softmax_rows(logits: &Matrix) -> Matrix {
    let cols = logits.cols();
    let mut out = logits.clone();
    if cols == 0 {
        return out;
    }
    for row in out.as_mut_slice().chunks_mut(cols) {
        let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let mut total = 0.0f32;
        for v in row.iter_mut() {
            *v = (*v - max).exp();
            total += *v;
        }
        for v in row.iter_mut() {
            *v /= total;
        }
    }
    out
}
