use super::traits::Dataset;
use std::ops::Range;
use stopwise_core::{Matrix, StopwiseError};

/// One labelled example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f32>,
    pub label: usize,
}

/// An ordered sequence of `(input vector, label)` pairs with a fixed
/// feature dimensionality.
///
/// Features are stored row-major in one buffer so that a contiguous range
/// of examples can be borrowed without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSplit {
    features: Vec<f32>,
    labels: Vec<usize>,
    n_features: usize,
}

impl LabeledSplit {
    /// Creates a split from a row-major feature buffer and one label per row.
    ///
    /// # Errors
    ///
    /// Returns `StopwiseError::DataError` if `n_features` is zero, or if the
    /// buffer length is not `labels.len() * n_features`.
    pub fn new(features: Vec<f32>, labels: Vec<usize>, n_features: usize) -> Result<Self, StopwiseError> {
        if n_features == 0 {
            return Err(StopwiseError::DataError(
                "a split needs at least one feature per example".to_string(),
            ));
        }
        let expected = labels.len().checked_mul(n_features).ok_or_else(|| {
            StopwiseError::DataError(format!(
                "{} examples x {} features overflows the feature buffer",
                labels.len(),
                n_features
            ))
        })?;
        if features.len() != expected {
            return Err(StopwiseError::DataError(format!(
                "feature buffer has {} values, expected {} examples x {} features",
                features.len(),
                labels.len(),
                n_features
            )));
        }
        Ok(LabeledSplit { features, labels, n_features })
    }

    /// Builds a split from individual samples. All samples must have the same
    /// dimensionality, which becomes the split's `n_features`.
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self, StopwiseError> {
        let n_features = match samples.first() {
            Some(s) => s.features.len(),
            None => {
                return Err(StopwiseError::DataError(
                    "cannot infer the dimensionality of an empty sample list".to_string(),
                ))
            }
        };
        let mut features = Vec::with_capacity(samples.len() * n_features);
        let mut labels = Vec::with_capacity(samples.len());
        for (i, sample) in samples.into_iter().enumerate() {
            if sample.features.len() != n_features {
                return Err(StopwiseError::DataError(format!(
                    "sample {} has {} features, expected {}",
                    i,
                    sample.features.len(),
                    n_features
                )));
            }
            features.extend(sample.features);
            labels.push(sample.label);
        }
        LabeledSplit::new(features, labels, n_features)
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn features(&self) -> &[f32] {
        &self.features
    }

    /// Number of classes implied by the labels (`max label + 1`).
    pub fn n_classes(&self) -> usize {
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }

    /// Borrows the features and labels of examples in `range`.
    pub fn range(&self, range: Range<usize>) -> Result<(&[f32], &[usize]), StopwiseError> {
        if range.start > range.end || range.end > self.labels.len() {
            return Err(StopwiseError::IndexOutOfBounds {
                index: range.end,
                len: self.labels.len(),
            });
        }
        let features = &self.features[range.start * self.n_features..range.end * self.n_features];
        Ok((features, &self.labels[range]))
    }

    /// Copies the examples in `range` into a new split.
    pub fn slice(&self, range: Range<usize>) -> Result<LabeledSplit, StopwiseError> {
        let (features, labels) = self.range(range)?;
        LabeledSplit::new(features.to_vec(), labels.to_vec(), self.n_features)
    }

    /// The whole split as a `[len, n_features]` matrix.
    pub fn to_matrix(&self) -> Result<Matrix, StopwiseError> {
        Matrix::from_vec(self.features.clone(), self.labels.len(), self.n_features)
    }
}

impl Dataset for LabeledSplit {
    type Item = Sample;

    fn get(&self, index: usize) -> Result<Self::Item, StopwiseError> {
        let (features, labels) = self
            .range(index..index + 1)
            .map_err(|_| StopwiseError::IndexOutOfBounds { index, len: self.labels.len() })?;
        Ok(Sample {
            features: features.to_vec(),
            label: labels[0],
        })
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
#[path = "labeled_split_test.rs"]
mod tests;
