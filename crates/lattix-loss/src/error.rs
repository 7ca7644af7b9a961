use thiserror::Error;

/// Errors that can occur in lattix-loss.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown loss name, duplicate registration, or an unusable `eta`.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A required hyperparameter has no value and no default.
    #[error("Missing hyperparameter `{param}` for loss `{loss}`")]
    MissingHyperparameter { loss: String, param: String },
    /// A recognised hyperparameter has a value that is not a finite number.
    #[error("Invalid hyperparameter `{param}` for loss `{loss}`: {reason}")]
    InvalidHyperparameter {
        loss: String,
        param: String,
        reason: String,
    },
    /// Score tensors do not have the shapes the loss requires.
    #[error("Shape mismatch: scores_pos has {pos} rows, scores_neg has {neg} rows (expected {expected})")]
    ShapeMismatch {
        pos: usize,
        neg: usize,
        expected: String,
    },
    /// Candle tensor error.
    #[error("Tensor error: {0}")]
    Tensor(#[from] candle_core::Error),
    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for lattix-loss.
pub type Result<T> = std::result::Result<T, Error>;
