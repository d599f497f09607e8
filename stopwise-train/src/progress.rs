// stopwise-train/src/progress.rs

/// What a validation check changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckOutcome {
    /// The validation loss did not beat the best so far.
    NoImprovement,
    /// New best; `extended` tells whether patience grew.
    Improved { extended: bool },
}

/// Mutable state of the early-stopping loop.
///
/// `best_validation_loss` only ever decreases and `patience` only ever
/// increases.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingProgress {
    epoch: usize,
    iteration: usize,
    best_validation_loss: f64,
    best_iteration: Option<usize>,
    patience: usize,
    test_score: Option<f64>,
    n_checks: usize,
    patience_increase: f64,
    improvement_threshold: f64,
}

impl TrainingProgress {
    /// Starts with an infinite best loss and the given patience budget.
    pub fn new(patience: usize, patience_increase: f64, improvement_threshold: f64) -> Self {
        TrainingProgress {
            epoch: 0,
            iteration: 0,
            best_validation_loss: f64::INFINITY,
            best_iteration: None,
            patience,
            test_score: None,
            n_checks: 0,
            patience_increase,
            improvement_threshold,
        }
    }

    /// Records that `iteration` of `epoch` has been trained on.
    pub fn advance(&mut self, epoch: usize, iteration: usize) {
        self.epoch = epoch;
        self.iteration = iteration;
    }

    /// Folds a validation loss measured at `iteration` into the state.
    ///
    /// A loss strictly below the best becomes the new best. If it is also
    /// below `best * improvement_threshold`, patience is raised to
    /// `floor(iteration * patience_increase)` when that is larger.
    pub fn record_validation(&mut self, iteration: usize, loss: f64) -> CheckOutcome {
        self.n_checks += 1;
        let improved = loss < self.best_validation_loss;
        if !improved {
            return CheckOutcome::NoImprovement;
        }
        let significant = loss < self.best_validation_loss * self.improvement_threshold;
        let mut extended = false;
        if significant {
            let candidate = (iteration as f64 * self.patience_increase).floor() as usize;
            if candidate > self.patience {
                log::debug!(
                    "patience extended from {} to {} at iteration {}",
                    self.patience,
                    candidate,
                    iteration
                );
                self.patience = candidate;
                extended = true;
            }
        }
        self.best_validation_loss = loss;
        self.best_iteration = Some(iteration);
        CheckOutcome::Improved { extended }
    }

    /// Stores the test error of the current best checkpoint.
    pub fn record_test_score(&mut self, score: f64) {
        self.test_score = Some(score);
    }

    /// True once the patience budget is used up at `iteration`.
    pub fn should_stop(&self, iteration: usize) -> bool {
        self.patience <= iteration
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn best_validation_loss(&self) -> f64 {
        self.best_validation_loss
    }

    pub fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    pub fn patience(&self) -> usize {
        self.patience
    }

    pub fn test_score(&self) -> Option<f64> {
        self.test_score
    }

    pub fn n_checks(&self) -> usize {
        self.n_checks
    }
}

#[cfg(test)]
#[path = "progress_test.rs"]
mod tests;
