// stopwise-train/src/config.rs

use stopwise_core::StopwiseError;

/// Settings of the early-stopping loop.
///
/// Defaults follow the classic MLP recipe: batches of 20, up to 1000
/// epochs, an initial patience of 10000 iterations doubled on every
/// significant improvement (a relative gain of at least 0.5 %).
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    /// Number of examples per minibatch.
    pub batch_size: usize,
    /// Upper bound on the number of epochs.
    pub n_epochs: usize,
    /// Initial patience, in iterations.
    pub patience: usize,
    /// Factor applied to the current iteration when patience is extended.
    pub patience_increase: f64,
    /// A new best must be below `best * improvement_threshold` to extend patience.
    pub improvement_threshold: f64,
    /// Iterations between validation checks; `None` means
    /// `min(n_train_batches, patience / 2)`.
    pub validation_frequency: Option<usize>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            batch_size: 20,
            n_epochs: 1000,
            patience: 10000,
            patience_increase: 2.0,
            improvement_threshold: 0.995,
            validation_frequency: None,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_epochs(mut self, n_epochs: usize) -> Self {
        self.n_epochs = n_epochs;
        self
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    pub fn with_patience_increase(mut self, patience_increase: f64) -> Self {
        self.patience_increase = patience_increase;
        self
    }

    pub fn with_improvement_threshold(mut self, improvement_threshold: f64) -> Self {
        self.improvement_threshold = improvement_threshold;
        self
    }

    pub fn with_validation_frequency(mut self, validation_frequency: usize) -> Self {
        self.validation_frequency = Some(validation_frequency);
        self
    }

    /// Checks the settings that do not depend on the data.
    ///
    /// # Errors
    ///
    /// Returns `StopwiseError::ConfigurationError` if the batch size or the
    /// epoch limit is zero, if the improvement threshold is not finite and
    /// positive, if the patience increase is not finite or below 1, or if an
    /// explicit validation frequency is zero.
    pub fn validate(&self) -> Result<(), StopwiseError> {
        if self.batch_size == 0 {
            return Err(StopwiseError::ConfigurationError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.n_epochs == 0 {
            return Err(StopwiseError::ConfigurationError(
                "n_epochs must be at least 1".to_string(),
            ));
        }
        if !self.improvement_threshold.is_finite() || self.improvement_threshold <= 0.0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "improvement_threshold must be finite and positive, got {}",
                self.improvement_threshold
            )));
        }
        if !self.patience_increase.is_finite() || self.patience_increase < 1.0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "patience_increase must be finite and at least 1, got {}",
                self.patience_increase
            )));
        }
        if self.validation_frequency == Some(0) {
            return Err(StopwiseError::ConfigurationError(
                "validation_frequency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the validation frequency for a training split of
    /// `n_train_batches` minibatches.
    ///
    /// # Errors
    ///
    /// Returns `StopwiseError::ConfigurationError` if the frequency resolves
    /// to zero, which happens by default when `patience < 2`.
    pub fn resolve_validation_frequency(&self, n_train_batches: usize) -> Result<usize, StopwiseError> {
        let frequency = self
            .validation_frequency
            .unwrap_or_else(|| n_train_batches.min(self.patience / 2));
        if frequency == 0 {
            return Err(StopwiseError::ConfigurationError(format!(
                "validation frequency resolves to 0 (patience {}, {} training minibatches)",
                self.patience, n_train_batches
            )));
        }
        if frequency > n_train_batches {
            log::warn!(
                "validation frequency {} exceeds the {} minibatches of an epoch; some epochs will not be validated",
                frequency,
                n_train_batches
            );
        }
        Ok(frequency)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
