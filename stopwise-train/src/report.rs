// stopwise-train/src/report.rs

use std::fmt;

/// One validation check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationCheck {
    pub epoch: usize,
    /// 1-based position of the minibatch within its epoch.
    pub minibatch: usize,
    pub n_batches: usize,
    pub iteration: usize,
    /// Mean error rate over the validation minibatches.
    pub validation_loss: f64,
    pub improved: bool,
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Lowest mean validation error seen; infinite when no check ran.
    pub best_validation_loss: f64,
    pub best_iteration: Option<usize>,
    /// Mean test error measured at the best checkpoint.
    pub test_score: Option<f64>,
    pub epochs_run: usize,
    /// Number of training steps taken.
    pub iterations_run: usize,
    /// True when patience, not the epoch limit, ended training.
    pub stopped_early: bool,
    /// Patience budget at the end of training.
    pub final_patience: usize,
    pub validation_history: Vec<ValidationCheck>,
    pub last_training_loss: Option<f64>,
}

impl TrainingReport {
    /// Best validation error in percent.
    pub fn best_validation_percent(&self) -> f64 {
        self.best_validation_loss * 100.0
    }

    pub fn test_percent(&self) -> Option<f64> {
        self.test_score.map(|s| s * 100.0)
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.best_iteration, self.test_percent()) {
            (Some(iteration), Some(test)) => write!(
                f,
                "Optimization complete. Best validation score of {:.2} % obtained at iteration {}, with test performance {:.2} %",
                self.best_validation_percent(),
                iteration + 1,
                test
            )?,
            _ => write!(f, "Optimization complete. No validation check improved on the initial model")?,
        }
        write!(
            f,
            " ({} epochs, {} iterations{})",
            self.epochs_run,
            self.iterations_run,
            if self.stopped_early { ", stopped early" } else { "" }
        )
    }
}
