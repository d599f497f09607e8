// stopwise-data/src/loader.rs

use crate::datasets::{DataSplits, LabeledSplit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use stopwise_core::StopwiseError;

/// Produces the three splits of a named dataset.
pub trait DatasetLoader {
    /// Loads the dataset known as `identifier`.
    ///
    /// # Errors
    ///
    /// Implementations return `StopwiseError::DataError` when the dataset
    /// cannot be produced.
    fn load(&self, identifier: &str) -> Result<DataSplits, StopwiseError>;
}

/// Generates Gaussian class blobs.
///
/// Each class gets a centre drawn uniformly in `[-centre_range, centre_range]`
/// per feature; examples are sampled around their class centre with standard
/// deviation `spread`. Labels are assigned round-robin, so every split holds
/// all classes as long as it has at least `n_classes` examples.
///
/// The generator is seeded from `seed` combined with a hash of the
/// identifier: the same identifier always yields the same splits, and two
/// identifiers yield different ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticLoader {
    pub n_train: usize,
    pub n_valid: usize,
    pub n_test: usize,
    pub n_features: usize,
    pub n_classes: usize,
    pub spread: f32,
    pub centre_range: f32,
    pub seed: u64,
}

impl Default for SyntheticLoader {
    fn default() -> Self {
        SyntheticLoader {
            n_train: 500,
            n_valid: 100,
            n_test: 100,
            n_features: 10,
            n_classes: 3,
            spread: 1.0,
            centre_range: 4.0,
            seed: 1234,
        }
    }
}

impl SyntheticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sizes(mut self, n_train: usize, n_valid: usize, n_test: usize) -> Self {
        self.n_train = n_train;
        self.n_valid = n_valid;
        self.n_test = n_test;
        self
    }

    pub fn with_features(mut self, n_features: usize) -> Self {
        self.n_features = n_features;
        self
    }

    pub fn with_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = n_classes;
        self
    }

    pub fn with_spread(mut self, spread: f32) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the generator settings are usable.
    pub fn validate(&self) -> Result<(), StopwiseError> {
        if self.n_features == 0 {
            return Err(StopwiseError::ConfigurationError(
                "synthetic data needs at least one feature".to_string(),
            ));
        }
        if self.n_classes < 2 {
            return Err(StopwiseError::ConfigurationError(format!(
                "synthetic data needs at least two classes, got {}",
                self.n_classes
            )));
        }
        if !self.spread.is_finite() || self.spread <= 0.0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "spread must be finite and positive, got {}",
                self.spread
            )));
        }
        if !self.centre_range.is_finite() || self.centre_range <= 0.0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "centre range must be finite and positive, got {}",
                self.centre_range
            )));
        }
        self.total().map(|_| ())
    }

    /// Number of examples across the three splits.
    pub fn total(&self) -> Result<usize, StopwiseError> {
        self.n_train
            .checked_add(self.n_valid)
            .and_then(|n| n.checked_add(self.n_test))
            .ok_or_else(|| {
                StopwiseError::DataError(format!(
                    "split sizes {}/{}/{} overflow",
                    self.n_train, self.n_valid, self.n_test
                ))
            })
    }

    fn generate(&self, rng: &mut StdRng) -> Result<LabeledSplit, StopwiseError> {
        let centres: Vec<Vec<f32>> = (0..self.n_classes)
            .map(|_| {
                (0..self.n_features)
                    .map(|_| rng.gen_range(-self.centre_range..=self.centre_range))
                    .collect()
            })
            .collect();
        let noise = Normal::new(0.0f32, self.spread)
            .map_err(|e| StopwiseError::ConfigurationError(format!("invalid spread: {}", e)))?;

        let total = self.total()?;
        let values = total.checked_mul(self.n_features).ok_or_else(|| {
            StopwiseError::DataError(format!(
                "{} examples x {} features overflows the feature buffer",
                total, self.n_features
            ))
        })?;
        let mut features = Vec::with_capacity(values);
        let mut labels = Vec::with_capacity(total);
        for i in 0..total {
            let label = i % self.n_classes;
            features.extend(centres[label].iter().map(|c| c + noise.sample(rng)));
            labels.push(label);
        }
        LabeledSplit::new(features, labels, self.n_features)
    }
}

impl DatasetLoader for SyntheticLoader {
    fn load(&self, identifier: &str) -> Result<DataSplits, StopwiseError> {
        if identifier.is_empty() {
            return Err(StopwiseError::DataError("empty dataset identifier".to_string()));
        }
        self.validate()?;
        let seed = self.seed ^ fnv1a(identifier);
        log::debug!(
            "Generating synthetic dataset '{}' ({}/{}/{} examples, {} features, {} classes, seed {})",
            identifier,
            self.n_train,
            self.n_valid,
            self.n_test,
            self.n_features,
            self.n_classes,
            seed
        );
        let mut rng = StdRng::seed_from_u64(seed);
        let all = self.generate(&mut rng)?;
        DataSplits::partition(&all, self.n_train, self.n_valid)
    }
}

// 64-bit FNV-1a.
fn fnv1a(text: &str) -> u64 {
    text.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
