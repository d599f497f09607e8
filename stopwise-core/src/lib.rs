//! Numerical building blocks for stopwise: a dense matrix type, a named
//! parameter store, weight initialisation, layers, the MLP model and the
//! SGD update rule.

pub mod error;
pub mod matrix;
pub mod nn;
pub mod optim;
pub mod params;

pub use error::StopwiseError;
pub use matrix::Matrix;
pub use params::{Gradients, ParamStore, Updates};
