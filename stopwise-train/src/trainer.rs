// stopwise-train/src/trainer.rs

use crate::config::TrainerConfig;
use crate::objective::Objective;
use crate::progress::{CheckOutcome, TrainingProgress};
use crate::report::{TrainingReport, ValidationCheck};
use crate::schedule::Schedule;
use stopwise_core::{ParamStore, StopwiseError};
use stopwise_data::{DataSplits, Minibatches, Sampler, SequentialSampler};

/// Minibatch trainer with patience-based early stopping.
///
/// The trainer owns the parameters for the duration of training; get them
/// back with `params` or `into_params`.
#[derive(Debug)]
pub struct Trainer {
    config: TrainerConfig,
    splits: DataSplits,
    params: ParamStore,
    sampler: Box<dyn Sampler>,
    n_train_batches: usize,
    validation_frequency: usize,
}

impl Trainer {
    /// Validates `config` against `splits` and takes ownership of `params`.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` for invalid settings, see `TrainerConfig::validate`,
    ///   or when the validation frequency resolves to zero.
    /// * `DataError` if a split is empty or smaller than one minibatch.
    pub fn new(config: TrainerConfig, splits: DataSplits, params: ParamStore) -> Result<Self, StopwiseError> {
        config.validate()?;
        splits.ensure_non_empty()?;
        let n_train_batches = Minibatches::new(splits.train(), config.batch_size)?.len();
        Minibatches::new(splits.valid(), config.batch_size)?;
        Minibatches::new(splits.test(), config.batch_size)?;
        let validation_frequency = config.resolve_validation_frequency(n_train_batches)?;
        Ok(Trainer {
            config,
            splits,
            params,
            sampler: Box::new(SequentialSampler::new()),
            n_train_batches,
            validation_frequency,
        })
    }

    /// Replaces the training minibatch order (sequential by default).
    ///
    /// The sampler must visit exactly `n_train_batches` minibatches per
    /// epoch; `fit` returns a `ConfigurationError` otherwise.
    pub fn with_sampler(mut self, sampler: impl Sampler + 'static) -> Self {
        self.sampler = Box::new(sampler);
        self
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn splits(&self) -> &DataSplits {
        &self.splits
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn into_params(self) -> ParamStore {
        self.params
    }

    pub fn n_train_batches(&self) -> usize {
        self.n_train_batches
    }

    pub fn validation_frequency(&self) -> usize {
        self.validation_frequency
    }

    /// Runs the early-stopping loop.
    ///
    /// Every `validation_frequency` iterations the mean validation error is
    /// computed. A new best also triggers a test evaluation and may extend
    /// patience. Training stops once `patience <= iteration` or after
    /// `n_epochs` epochs.
    ///
    /// # Errors
    ///
    /// Whatever `objective` returns, unchanged.
    pub fn fit<O: Objective>(&mut self, objective: &mut O) -> Result<TrainingReport, O::Error> {
        let Trainer {
            config,
            splits,
            params,
            sampler,
            n_train_batches,
            validation_frequency,
        } = self;
        let train = Minibatches::new(splits.train(), config.batch_size)?;
        if sampler.len(*n_train_batches) != *n_train_batches {
            return Err(StopwiseError::ConfigurationError(format!(
                "sampler visits {} minibatches per epoch, expected {}",
                sampler.len(*n_train_batches),
                n_train_batches
            ))
            .into());
        }
        let valid = Minibatches::new(splits.valid(), config.batch_size)?;
        let test = Minibatches::new(splits.test(), config.batch_size)?;
        let n_batches = *n_train_batches;
        let frequency = *validation_frequency;

        log::info!(
            "training: {} train / {} validation / {} test minibatches of {}, validating every {} iterations, patience {}",
            n_batches,
            valid.len(),
            test.len(),
            config.batch_size,
            frequency,
            config.patience
        );

        let mut progress = TrainingProgress::new(
            config.patience,
            config.patience_increase,
            config.improvement_threshold,
        );
        let mut history = Vec::new();
        let mut last_training_loss = None;
        let mut steps = 0;
        let mut stopped_early = false;

        for step in Schedule::new(config.n_epochs, n_batches, &mut **sampler) {
            let batch = train.get(step.batch_index)?;
            let output = objective.train_step(params, &batch)?;
            log::debug!("iteration {}: training loss {}", step.iteration, output.loss);
            last_training_loss = Some(output.loss);
            progress.advance(step.epoch, step.iteration);
            steps += 1;

            if (step.iteration + 1) % frequency == 0 {
                let loss = mean_error(objective, params, &valid)?;
                log::info!(
                    "epoch {}, minibatch {}/{}, validation error {:.2} %",
                    step.epoch,
                    step.position + 1,
                    n_batches,
                    loss * 100.0
                );
                let outcome = progress.record_validation(step.iteration, loss);
                let improved = matches!(outcome, CheckOutcome::Improved { .. });
                if improved {
                    let score = mean_error(objective, params, &test)?;
                    progress.record_test_score(score);
                    log::info!(
                        "     epoch {}, minibatch {}/{}, test error of best model {:.2} %",
                        step.epoch,
                        step.position + 1,
                        n_batches,
                        score * 100.0
                    );
                }
                history.push(ValidationCheck {
                    epoch: step.epoch,
                    minibatch: step.position + 1,
                    n_batches,
                    iteration: step.iteration,
                    validation_loss: loss,
                    improved,
                });
            }

            if progress.should_stop(step.iteration) {
                stopped_early = true;
                break;
            }
        }

        let report = TrainingReport {
            best_validation_loss: progress.best_validation_loss(),
            best_iteration: progress.best_iteration(),
            test_score: progress.test_score(),
            epochs_run: progress.epoch(),
            iterations_run: steps,
            stopped_early,
            final_patience: progress.patience(),
            validation_history: history,
            last_training_loss,
        };
        log::info!("{}", report);
        Ok(report)
    }
}

/// Mean error rate of `objective` over every minibatch of `batches`.
fn mean_error<O: Objective>(
    objective: &O,
    params: &ParamStore,
    batches: &Minibatches<'_>,
) -> Result<f64, O::Error> {
    let mut total = 0.0;
    for batch in batches.iter() {
        total += objective.evaluate(params, &batch)?;
    }
    Ok(total / batches.len() as f64)
}

#[cfg(test)]
#[path = "trainer_test.rs"]
mod tests;
