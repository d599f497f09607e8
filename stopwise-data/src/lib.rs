//! Data plumbing for stopwise: labelled splits, minibatch partitioning,
//! minibatch-order samplers and dataset loaders.

pub mod datasets;
pub mod loader;
pub mod minibatch;
pub mod samplers;

pub use datasets::{DataSplits, Dataset, LabeledSplit, Sample};
pub use loader::{DatasetLoader, SyntheticLoader};
pub use minibatch::{Minibatch, Minibatches};
pub use samplers::{Sampler, SequentialSampler, ShuffledSampler};
