//! Trains a one-hidden-layer MLP on synthetic Gaussian blobs.
//!
//! Run with `RUST_LOG=info cargo run -p stopwise-train --example mlp_synthetic`.

use stopwise_core::{ParamStore, StopwiseError};
use stopwise_data::{DatasetLoader, SyntheticLoader};
use stopwise_train::{MlpConfig, MlpObjective, Trainer, TrainerConfig};

fn main() -> Result<(), StopwiseError> {
    env_logger::builder().is_test(false).init();

    let splits = SyntheticLoader::new()
        .with_sizes(2000, 500, 500)
        .with_features(20)
        .with_classes(5)
        .with_spread(2.0)
        .load("blobs")?;
    let (n_in, n_out) = (splits.n_features(), splits.n_classes());

    let mut params = ParamStore::new();
    let mlp_config = MlpConfig::new().with_hidden(100);
    let mut objective = MlpObjective::build(&mlp_config, &mut params, n_in, n_out)?;
    println!(
        "MLP {} -> {} -> {}, {} parameters",
        n_in,
        mlp_config.n_hidden,
        n_out,
        params.num_elements()
    );

    let config = TrainerConfig::new().with_epochs(50);
    let mut trainer = Trainer::new(config, splits, params)?;
    let report = trainer.fit(&mut objective)?;
    println!("{}", report);
    Ok(())
}
