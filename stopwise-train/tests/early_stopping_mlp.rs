use stopwise_core::ParamStore;
use stopwise_data::{DatasetLoader, ShuffledSampler, SyntheticLoader};
use stopwise_train::{MlpConfig, MlpObjective, Trainer, TrainerConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(sampler_seed: Option<u64>) -> (stopwise_train::TrainingReport, ParamStore) {
    let splits = SyntheticLoader::new()
        .with_sizes(300, 100, 100)
        .with_features(6)
        .with_classes(3)
        .load("blobs")
        .unwrap();
    let mut params = ParamStore::new();
    let mlp_config = MlpConfig::new().with_hidden(16).with_learning_rate(0.1).with_seed(42);
    let mut objective = MlpObjective::build(&mlp_config, &mut params, 6, 3).unwrap();
    let config = TrainerConfig::new()
        .with_batch_size(20)
        .with_epochs(40);
    let mut trainer = Trainer::new(config, splits, params).unwrap();
    if let Some(seed) = sampler_seed {
        trainer = trainer.with_sampler(ShuffledSampler::new(seed));
    }
    let report = trainer.fit(&mut objective).unwrap();
    (report, trainer.into_params())
}

#[test]
fn test_mlp_reaches_low_test_error_on_blobs() {
    init_logger();
    let (report, params) = run(None);
    assert!(report.best_iteration.is_some());
    let test = report.test_score.unwrap();
    assert!(test < 0.1, "test error {}", test);
    assert!(report.best_validation_loss < 0.1);
    assert!(report.iterations_run <= 40 * 15);
    assert_eq!(params.len(), 4);
    assert!(report.to_string().starts_with("Optimization complete."));
}

#[test]
fn test_mlp_runs_are_reproducible() {
    init_logger();
    let (first, first_params) = run(Some(5));
    let (second, second_params) = run(Some(5));
    assert_eq!(first, second);
    assert_eq!(first_params, second_params);
}
