// stopwise-train/src/trainer_test.rs

use super::*;
use crate::objective::StepOutput;
use approx::assert_relative_eq;
use stopwise_core::Matrix;
use stopwise_data::{LabeledSplit, Minibatch, Sampler, ShuffledSampler};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, PartialEq)]
enum TestError {
    Core(StopwiseError),
    Diverged(usize),
}

impl From<StopwiseError> for TestError {
    fn from(e: StopwiseError) -> Self {
        TestError::Core(e)
    }
}

/// Objective whose error rate is a function of how many steps were taken
/// and of the order minibatches were visited in.
struct Scripted {
    error_at: Box<dyn Fn(usize, usize) -> f64>,
    fail_at: Option<usize>,
    visited: Vec<usize>,
}

impl Scripted {
    fn new(error_at: impl Fn(usize, usize) -> f64 + 'static) -> Self {
        Scripted {
            error_at: Box::new(error_at),
            fail_at: None,
            visited: Vec::new(),
        }
    }
}

fn counter(params: &ParamStore, name: &str) -> Result<usize, StopwiseError> {
    Ok(params.get(name)?.as_slice()[0] as usize)
}

impl Objective for Scripted {
    type Error = TestError;

    fn train_step(&mut self, params: &mut ParamStore, batch: &Minibatch<'_>) -> Result<StepOutput, TestError> {
        let steps = counter(params, "steps")?;
        if self.fail_at == Some(steps) {
            return Err(TestError::Diverged(steps));
        }
        let trace = counter(params, "trace")?;
        params.get_mut("steps")?.as_mut_slice()[0] = (steps + 1) as f32;
        params.get_mut("trace")?.as_mut_slice()[0] = ((trace * 31 + batch.index + 1) % 9973) as f32;
        self.visited.push(batch.index);
        Ok(StepOutput::new(1.0 / (steps + 1) as f64))
    }

    fn evaluate(&self, params: &ParamStore, batch: &Minibatch<'_>) -> Result<f64, TestError> {
        let base = (self.error_at)(counter(params, "steps")?, counter(params, "trace")?);
        // Test examples carry feature 1.0, validation examples 0.0.
        Ok(base + 0.001 * f64::from(batch.features[0]))
    }
}

fn params() -> ParamStore {
    let mut store = ParamStore::new();
    store.register("steps", Matrix::zeros(1, 1)).unwrap();
    store.register("trace", Matrix::zeros(1, 1)).unwrap();
    store
}

fn split(n: usize, value: f32) -> LabeledSplit {
    LabeledSplit::new(vec![value; n], vec![0; n], 1).unwrap()
}

fn splits(n_train: usize, n_valid: usize, n_test: usize) -> DataSplits {
    DataSplits::new(split(n_train, 0.0), split(n_valid, 0.0), split(n_test, 1.0)).unwrap()
}

fn decreasing(steps: usize, _trace: usize) -> f64 {
    1.0 / steps as f64
}

fn jagged(steps: usize, _trace: usize) -> f64 {
    ((steps * 7919) % 13) as f64 / 13.0
}

#[test]
fn test_hundred_examples_one_check_per_epoch() {
    init_logger();
    let config = TrainerConfig::new().with_batch_size(20).with_epochs(4).with_patience(10);
    let mut trainer = Trainer::new(config, splits(100, 40, 40), params()).unwrap();
    assert_eq!(trainer.n_train_batches(), 5);
    assert_eq!(trainer.validation_frequency(), 5);

    let mut objective = Scripted::new(decreasing);
    let report = trainer.fit(&mut objective).unwrap();

    let checks: Vec<usize> = report.validation_history.iter().map(|c| c.iteration).collect();
    assert_eq!(checks, vec![4, 9, 14, 19]);
    assert!(report.validation_history.iter().all(|c| c.minibatch == 5 && c.n_batches == 5));
    assert_eq!(report.best_iteration, Some(19));
    assert_relative_eq!(report.best_validation_loss, 1.0 / 20.0);
    assert_eq!(report.epochs_run, 4);
    assert_eq!(report.iterations_run, 20);
    assert!(!report.stopped_early);
    assert_eq!(report.final_patience, 38);
    assert_eq!(report.last_training_loss, Some(1.0 / 20.0));
}

#[test]
fn test_stops_at_initial_patience_without_extension() {
    init_logger();
    let config = TrainerConfig::new()
        .with_batch_size(20)
        .with_epochs(100)
        .with_patience(10)
        .with_improvement_threshold(1e-9);
    let mut trainer = Trainer::new(config, splits(100, 40, 40), params()).unwrap();
    let report = trainer.fit(&mut Scripted::new(decreasing)).unwrap();

    assert!(report.stopped_early);
    assert_eq!(report.iterations_run, 11);
    assert_eq!(report.final_patience, 10);
    assert_eq!(report.epochs_run, 3);
    assert_eq!(counter(trainer.params(), "steps").unwrap(), 11);
    // Error keeps falling, so the best is the last check before patience ran out.
    let last_check = report.validation_history.last().map(|c| c.iteration);
    assert_eq!(last_check, Some(9));
    assert_eq!(report.best_iteration, last_check);
}

#[test]
fn test_unit_patience_increase_never_extends() {
    let config = TrainerConfig::new()
        .with_batch_size(10)
        .with_epochs(50)
        .with_patience(12)
        .with_patience_increase(1.0);
    let mut trainer = Trainer::new(config, splits(30, 10, 10), params()).unwrap();
    let report = trainer.fit(&mut Scripted::new(decreasing)).unwrap();
    assert!(report.stopped_early);
    assert_eq!(report.iterations_run, 13);
    assert_eq!(report.final_patience, 12);
}

#[test]
fn test_steps_bounded_by_epochs_times_batches() {
    for (n_train, batch, epochs) in [(100, 20, 3), (57, 10, 2), (9, 3, 7), (5, 5, 4)] {
        let config = TrainerConfig::new()
            .with_batch_size(batch)
            .with_epochs(epochs)
            .with_patience(1_000_000);
        let mut trainer = Trainer::new(config, splits(n_train, batch, batch), params()).unwrap();
        let report = trainer.fit(&mut Scripted::new(jagged)).unwrap();
        assert_eq!(report.iterations_run, epochs * (n_train / batch));
        assert!(!report.stopped_early);
    }
}

#[test]
fn test_best_is_minimum_of_history() {
    let config = TrainerConfig::new()
        .with_batch_size(2)
        .with_epochs(30)
        .with_patience(40)
        .with_validation_frequency(3);
    let mut trainer = Trainer::new(config, splits(10, 4, 4), params()).unwrap();
    let report = trainer.fit(&mut Scripted::new(jagged)).unwrap();

    assert!(!report.validation_history.is_empty());
    for check in &report.validation_history {
        assert!(report.best_validation_loss <= check.validation_loss);
    }
    let best = report
        .validation_history
        .iter()
        .find(|c| Some(c.iteration) == report.best_iteration)
        .unwrap();
    assert_eq!(best.validation_loss, report.best_validation_loss);
    assert!(best.improved);
    // Test error is measured at the best checkpoint.
    assert_relative_eq!(report.test_score.unwrap(), report.best_validation_loss + 0.001, epsilon = 1e-12);
}

#[test]
fn test_frequency_longer_than_epoch() {
    let config = TrainerConfig::new()
        .with_batch_size(1)
        .with_epochs(3)
        .with_patience(100)
        .with_validation_frequency(7);
    let mut trainer = Trainer::new(config, splits(5, 1, 1), params()).unwrap();
    let report = trainer.fit(&mut Scripted::new(decreasing)).unwrap();
    let checks: Vec<(usize, usize)> = report
        .validation_history
        .iter()
        .map(|c| (c.epoch, c.minibatch))
        .collect();
    assert_eq!(checks, vec![(2, 2), (3, 4)]);
}

#[test]
fn test_no_check_before_patience_runs_out() {
    let config = TrainerConfig::new()
        .with_batch_size(1)
        .with_epochs(10)
        .with_patience(3)
        .with_validation_frequency(50);
    let mut trainer = Trainer::new(config, splits(5, 1, 1), params()).unwrap();
    let report = trainer.fit(&mut Scripted::new(decreasing)).unwrap();
    assert!(report.stopped_early);
    assert_eq!(report.iterations_run, 4);
    assert_eq!(report.best_iteration, None);
    assert_eq!(report.test_score, None);
    assert!(report.best_validation_loss.is_infinite());
}

#[test]
fn test_shuffled_runs_are_deterministic() {
    let run = |seed: u64| {
        let config = TrainerConfig::new().with_batch_size(2).with_epochs(5).with_patience(100);
        let mut trainer = Trainer::new(config, splits(20, 4, 4), params())
            .unwrap()
            .with_sampler(ShuffledSampler::new(seed));
        let mut objective = Scripted::new(|_, trace| (trace % 97) as f64 / 97.0);
        let report = trainer.fit(&mut objective).unwrap();
        (report, objective.visited)
    };
    let (first, visited) = run(17);
    let (second, visited_again) = run(17);
    assert_eq!(first, second);
    assert_eq!(visited, visited_again);
    for epoch in visited.chunks(10) {
        let mut sorted = epoch.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }
    let (_, other) = run(18);
    assert_ne!(visited, other);
}

#[test]
fn test_sequential_order_by_default() {
    let config = TrainerConfig::new().with_batch_size(5).with_epochs(2).with_patience(100);
    let mut trainer = Trainer::new(config, splits(15, 5, 5), params()).unwrap();
    let mut objective = Scripted::new(decreasing);
    trainer.fit(&mut objective).unwrap();
    assert_eq!(objective.visited, vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn test_objective_error_propagates_unmodified() {
    let config = TrainerConfig::new().with_batch_size(5).with_epochs(2).with_patience(100);
    let mut trainer = Trainer::new(config, splits(15, 5, 5), params()).unwrap();
    let mut objective = Scripted::new(decreasing);
    objective.fail_at = Some(3);
    assert_eq!(trainer.fit(&mut objective), Err(TestError::Diverged(3)));
}

#[test]
fn test_params_handed_back() {
    let config = TrainerConfig::new().with_batch_size(5).with_epochs(2).with_patience(100);
    let mut trainer = Trainer::new(config, splits(15, 5, 5), params()).unwrap();
    trainer.fit(&mut Scripted::new(decreasing)).unwrap();
    let store = trainer.into_params();
    assert_eq!(counter(&store, "steps").unwrap(), 6);
}

#[test]
fn test_batch_equal_to_split_size() {
    let config = TrainerConfig::new().with_batch_size(8).with_patience(4);
    let trainer = Trainer::new(config, splits(8, 8, 8), params()).unwrap();
    assert_eq!(trainer.n_train_batches(), 1);
    assert_eq!(trainer.validation_frequency(), 1);
}

#[test]
fn test_new_rejects_bad_data() {
    let config = TrainerConfig::new().with_batch_size(8);
    let empty_valid = DataSplits::new(split(16, 0.0), split(0, 0.0), split(8, 1.0)).unwrap();
    assert!(matches!(
        Trainer::new(config.clone(), empty_valid, params()),
        Err(StopwiseError::DataError(_))
    ));
    assert!(matches!(
        Trainer::new(config, splits(16, 8, 7), params()),
        Err(StopwiseError::DataError(_))
    ));
}

#[test]
fn test_new_rejects_bad_configuration() {
    assert!(matches!(
        Trainer::new(TrainerConfig::new().with_batch_size(0), splits(10, 5, 5), params()),
        Err(StopwiseError::ConfigurationError(_))
    ));
    assert!(matches!(
        Trainer::new(TrainerConfig::new().with_batch_size(5).with_patience(1), splits(10, 5, 5), params()),
        Err(StopwiseError::ConfigurationError(_))
    ));
    assert!(matches!(
        Trainer::new(TrainerConfig::new().with_batch_size(5).with_epochs(0), splits(10, 5, 5), params()),
        Err(StopwiseError::ConfigurationError(_))
    ));
}

/// Visits every minibatch twice per epoch.
#[derive(Debug)]
struct Twice {
    honest: bool,
}

impl Sampler for Twice {
    fn iter(&mut self, n_batches: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        Box::new((0..n_batches).chain(0..n_batches))
    }

    fn len(&self, n_batches: usize) -> usize {
        if self.honest {
            2 * n_batches
        } else {
            n_batches
        }
    }
}

#[test]
fn test_sampler_with_wrong_length_is_rejected() {
    let config = TrainerConfig::new().with_batch_size(5).with_epochs(2).with_patience(100);
    let mut trainer = Trainer::new(config, splits(15, 5, 5), params())
        .unwrap()
        .with_sampler(Twice { honest: true });
    let result = trainer.fit(&mut Scripted::new(decreasing));
    assert!(matches!(result, Err(TestError::Core(StopwiseError::ConfigurationError(_)))));
    assert_eq!(counter(trainer.params(), "steps").unwrap(), 0);
}

#[test]
fn test_oversized_epoch_is_cut_at_batch_count() {
    let config = TrainerConfig::new()
        .with_batch_size(5)
        .with_epochs(2)
        .with_patience(100)
        .with_validation_frequency(3);
    let mut trainer = Trainer::new(config, splits(15, 5, 5), params())
        .unwrap()
        .with_sampler(Twice { honest: false });
    let report = trainer.fit(&mut Scripted::new(decreasing)).unwrap();
    assert_eq!(report.iterations_run, 6);
    let checks: Vec<usize> = report.validation_history.iter().map(|c| c.iteration).collect();
    assert_eq!(checks, vec![2, 5]);
}
