use thiserror::Error;

/// Custom error type for the stopwise workspace.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum StopwiseError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Matrix creation error: data length {data_len} does not match shape {shape:?}")]
    MatrixCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Parameter '{0}' is already registered")]
    DuplicateParameter(String),

    #[error("Non-finite value produced during {operation}")]
    NonFiniteValue { operation: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
