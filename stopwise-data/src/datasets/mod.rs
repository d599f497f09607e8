pub mod labeled_split;
pub mod splits;
pub mod traits;

pub use labeled_split::{LabeledSplit, Sample};
pub use splits::DataSplits;
pub use traits::Dataset;
