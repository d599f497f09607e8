// src/nn/mod.rs
// Layers, activations and the MLP model.

pub mod activation;
pub mod init;
pub mod layers;
pub mod mlp;

// Re-export common items
pub use activation::Activation;
pub use layers::{HiddenLayer, HiddenLayerBuilder, LogisticRegression};
pub use mlp::{Mlp, Regularization};
