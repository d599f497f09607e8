//! Minibatch SGD training with patience-based early stopping.
//!
//! A `Trainer` walks the training minibatches epoch after epoch, asking an
//! `Objective` for one gradient step per minibatch. Every few iterations it
//! measures the validation error; a new best records the test error and, if
//! the gain is large enough, extends the patience budget. Training ends when
//! the iteration count reaches the patience or the epoch limit runs out.

pub mod config;
pub mod objective;
pub mod objectives;
pub mod progress;
pub mod report;
pub mod schedule;
pub mod trainer;

pub use config::TrainerConfig;
pub use objective::{Objective, StepOutput};
pub use objectives::{LogisticObjective, MlpConfig, MlpObjective};
pub use progress::{CheckOutcome, TrainingProgress};
pub use report::{TrainingReport, ValidationCheck};
pub use schedule::{Schedule, Step};
pub use trainer::Trainer;
