pub mod hidden;
pub mod logistic;

pub use hidden::{HiddenGrads, HiddenLayer, HiddenLayerBuilder};
pub use logistic::{LogisticGrads, LogisticRegression};
