use crate::error::StopwiseError;
use crate::matrix::Matrix;
use crate::nn::activation::softmax_rows;
use crate::params::ParamStore;

/// Multi-class logistic regression: `softmax(input @ W + b)`.
///
/// Both parameters start at zero, so an untrained layer predicts the
/// uniform distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weight: String,
    bias: String,
    n_in: usize,
    n_out: usize,
}

/// Gradients of the mean negative log-likelihood for one batch.
#[derive(Debug, Clone)]
pub struct LogisticGrads {
    pub nll: f32,
    pub weight: Matrix,
    pub bias: Matrix,
    /// Gradient with respect to the layer input.
    pub input: Matrix,
}

/// Checks that there is one label per row and that every label is a valid class.
pub(crate) fn check_labels(labels: &[usize], rows: usize, n_classes: usize) -> Result<(), StopwiseError> {
    if labels.len() != rows {
        return Err(StopwiseError::ShapeMismatch {
            expected: vec![rows],
            actual: vec![labels.len()],
            operation: "labels".to_string(),
        });
    }
    if let Some(&bad) = labels.iter().find(|&&y| y >= n_classes) {
        return Err(StopwiseError::IndexOutOfBounds { index: bad, len: n_classes });
    }
    Ok(())
}

impl LogisticRegression {
    /// Registers `<prefix>.W` (`[n_in, n_out]`) and `<prefix>.b` (`[1, n_out]`), both zero.
    pub fn new(
        store: &mut ParamStore,
        prefix: &str,
        n_in: usize,
        n_out: usize,
    ) -> Result<Self, StopwiseError> {
        if n_in == 0 || n_out == 0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "LogisticRegression needs non-zero dimensions, got [{}, {}]",
                n_in, n_out
            )));
        }
        let weight = format!("{}.W", prefix);
        let bias = format!("{}.b", prefix);
        if store.contains(&bias) {
            return Err(StopwiseError::DuplicateParameter(bias));
        }
        store.register(weight.clone(), Matrix::zeros(n_in, n_out))?;
        store.register(bias.clone(), Matrix::zeros(1, n_out))?;
        Ok(LogisticRegression { weight, bias, n_in, n_out })
    }

    pub fn n_in(&self) -> usize {
        self.n_in
    }

    pub fn n_out(&self) -> usize {
        self.n_out
    }

    pub fn weight_name(&self) -> &str {
        &self.weight
    }

    pub fn bias_name(&self) -> &str {
        &self.bias
    }

    /// Class probabilities, one row per example.
    pub fn p_y_given_x(&self, store: &ParamStore, input: &Matrix) -> Result<Matrix, StopwiseError> {
        let w = store.get(&self.weight)?;
        let b = store.get(&self.bias)?;
        let logits = input.matmul(w)?.add_row_vector(b)?;
        Ok(softmax_rows(&logits))
    }

    /// Most probable class of every example.
    pub fn predict(&self, store: &ParamStore, input: &Matrix) -> Result<Vec<usize>, StopwiseError> {
        Ok(self.p_y_given_x(store, input)?.argmax_rows())
    }

    /// Mean negative log-likelihood of `labels` under the model.
    pub fn negative_log_likelihood(
        &self,
        store: &ParamStore,
        input: &Matrix,
        labels: &[usize],
    ) -> Result<f32, StopwiseError> {
        let p = self.p_y_given_x(store, input)?;
        nll_from_probs(&p, labels)
    }

    /// Fraction of examples whose predicted class differs from the label.
    pub fn errors(&self, store: &ParamStore, input: &Matrix, labels: &[usize]) -> Result<f32, StopwiseError> {
        let p = self.p_y_given_x(store, input)?;
        error_rate(&p, labels)
    }

    /// Gradients of the mean NLL with respect to `W`, `b` and the input.
    pub fn gradients(
        &self,
        store: &ParamStore,
        input: &Matrix,
        labels: &[usize],
    ) -> Result<LogisticGrads, StopwiseError> {
        let p = self.p_y_given_x(store, input)?;
        let nll = nll_from_probs(&p, labels)?;
        let batch = input.rows() as f32;
        // d(mean NLL)/d(logits) = (p - onehot(y)) / batch
        let mut grad_logits = p;
        let cols = grad_logits.cols();
        for (row, &y) in grad_logits.as_mut_slice().chunks_mut(cols).zip(labels) {
            row[y] -= 1.0;
            for v in row.iter_mut() {
                *v /= batch;
            }
        }
        let w = store.get(&self.weight)?;
        Ok(LogisticGrads {
            nll,
            weight: input.transpose().matmul(&grad_logits)?,
            bias: grad_logits.column_sums(),
            input: grad_logits.matmul(&w.transpose())?,
        })
    }
}

pub(crate) fn nll_from_probs(p: &Matrix, labels: &[usize]) -> Result<f32, StopwiseError> {
    check_labels(labels, p.rows(), p.cols())?;
    if labels.is_empty() {
        return Err(StopwiseError::DataError("negative log-likelihood of an empty batch".to_string()));
    }
    let cols = p.cols();
    let total: f32 = p
        .as_slice()
        .chunks(cols)
        .zip(labels)
        .map(|(row, &y)| -row[y].max(f32::MIN_POSITIVE).ln())
        .sum();
    Ok(total / labels.len() as f32)
}

pub(crate) fn error_rate(p: &Matrix, labels: &[usize]) -> Result<f32, StopwiseError> {
    check_labels(labels, p.rows(), p.cols())?;
    if labels.is_empty() {
        return Err(StopwiseError::DataError("error rate of an empty batch".to_string()));
    }
    let wrong = p
        .argmax_rows()
        .iter()
        .zip(labels)
        .filter(|(pred, y)| pred != y)
        .count();
    Ok(wrong as f32 / labels.len() as f32)
}

#[cfg(test)]
#[path = "logistic_test.rs"]
mod tests;
