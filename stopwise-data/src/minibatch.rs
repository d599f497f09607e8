// minibatch.rs
//! # Minibatches
//!
//! Partitions a `LabeledSplit` into fixed-size, contiguous minibatches.
//! Examples left over after the last full batch are dropped.
//!
//! ```rust
//! use stopwise_data::datasets::LabeledSplit;
//! use stopwise_data::minibatch::Minibatches;
//!
//! let split = LabeledSplit::new(vec![0.0; 10], vec![0; 5], 2).unwrap();
//! let batches = Minibatches::new(&split, 2).unwrap();
//! assert_eq!(batches.len(), 2); // the fifth example is dropped
//! for batch in batches.iter() {
//!     assert_eq!(batch.len(), 2);
//! }
//! ```

use crate::datasets::LabeledSplit;
use stopwise_core::{Matrix, StopwiseError};

/// A borrowed, fixed-size slice of a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minibatch<'a> {
    /// Position of this batch within its split.
    pub index: usize,
    /// Row-major features, `len() * n_features` values.
    pub features: &'a [f32],
    pub labels: &'a [usize],
    pub n_features: usize,
}

impl<'a> Minibatch<'a> {
    /// Number of examples in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Copies the features into a `[len, n_features]` matrix.
    pub fn inputs(&self) -> Result<Matrix, StopwiseError> {
        Matrix::from_vec(self.features.to_vec(), self.len(), self.n_features)
    }
}

/// The minibatch partition of one split.
#[derive(Debug, Clone, Copy)]
pub struct Minibatches<'a> {
    split: &'a LabeledSplit,
    batch_size: usize,
    n_batches: usize,
}

impl<'a> Minibatches<'a> {
    /// Partitions `split` into `split.len() / batch_size` batches.
    ///
    /// # Errors
    /// * `ConfigurationError` if `batch_size` is zero.
    /// * `DataError` if the split is empty or smaller than one batch.
    pub fn new(split: &'a LabeledSplit, batch_size: usize) -> Result<Self, StopwiseError> {
        if batch_size == 0 {
            return Err(StopwiseError::ConfigurationError(
                "batch size must be at least 1".to_string(),
            ));
        }
        if split.is_empty() {
            return Err(StopwiseError::DataError("cannot batch an empty split".to_string()));
        }
        if batch_size > split.len() {
            return Err(StopwiseError::DataError(format!(
                "batch size {} exceeds split size {}",
                batch_size,
                split.len()
            )));
        }
        let n_batches = split.len() / batch_size;
        let dropped = split.len() % batch_size;
        if dropped > 0 {
            log::debug!(
                "Dropping {} trailing examples that do not fill a batch of {}",
                dropped,
                batch_size
            );
        }
        Ok(Minibatches { split, batch_size, n_batches })
    }

    /// Number of full batches.
    pub fn len(&self) -> usize {
        self.n_batches
    }

    pub fn is_empty(&self) -> bool {
        self.n_batches == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of trailing examples not covered by any batch.
    pub fn dropped(&self) -> usize {
        self.split.len() - self.n_batches * self.batch_size
    }

    /// Returns batch `index`, i.e. examples `[index * batch_size, (index + 1) * batch_size)`.
    pub fn get(&self, index: usize) -> Result<Minibatch<'a>, StopwiseError> {
        if index >= self.n_batches {
            return Err(StopwiseError::IndexOutOfBounds { index, len: self.n_batches });
        }
        let start = index * self.batch_size;
        let (features, labels) = self.split.range(start..start + self.batch_size)?;
        Ok(Minibatch {
            index,
            features,
            labels,
            n_features: self.split.n_features(),
        })
    }

    /// Iterates over every batch in index order.
    ///
    /// Yields exactly `len()` batches; the trailing partial chunk is skipped.
    pub fn iter(&self) -> impl Iterator<Item = Minibatch<'a>> + 'a {
        let n_features = self.split.n_features();
        self.split
            .labels()
            .chunks_exact(self.batch_size)
            .zip(self.split.features().chunks_exact(self.batch_size * n_features))
            .enumerate()
            .map(move |(index, (labels, features))| Minibatch {
                index,
                features,
                labels,
                n_features,
            })
    }
}

#[cfg(test)]
#[path = "minibatch_test.rs"]
mod tests;
