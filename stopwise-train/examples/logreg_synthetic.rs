//! Trains a softmax classifier on synthetic Gaussian blobs.

use stopwise_core::nn::Regularization;
use stopwise_core::{ParamStore, StopwiseError};
use stopwise_data::{DatasetLoader, ShuffledSampler, SyntheticLoader};
use stopwise_train::{LogisticObjective, Trainer, TrainerConfig};

fn main() -> Result<(), StopwiseError> {
    env_logger::builder().is_test(false).init();

    let splits = SyntheticLoader::new().with_spread(1.5).load("blobs")?;
    let mut params = ParamStore::new();
    let mut objective = LogisticObjective::build(&mut params, splits.n_features(), splits.n_classes(), 0.13)?
        .with_regularization(Regularization::new(0.0, 0.01));

    let config = TrainerConfig::new()
        .with_batch_size(25)
        .with_epochs(200)
        .with_patience(500);
    let mut trainer = Trainer::new(config, splits, params)?.with_sampler(ShuffledSampler::new(7));
    let report = trainer.fit(&mut objective)?;
    println!("{}", report);
    for check in report.validation_history.iter().filter(|c| c.improved) {
        println!(
            "  epoch {:>3}, iteration {:>5}: validation error {:.2} %",
            check.epoch,
            check.iteration + 1,
            check.validation_loss * 100.0
        );
    }
    Ok(())
}
