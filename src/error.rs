//! Error types for SafeHeart

use thiserror::Error;

/// Result type alias for SafeHeart operations
pub type Result<T> = std::result::Result<T, SafeHeartError>;

/// Main error type for the dataset, model and dashboard layers
#[derive(Error, Debug)]
pub enum SafeHeartError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Required column missing from dataset: {0}")]
    MissingColumn(String),

    #[error("Unrecognized value '{value}' for column '{field}'. Expected one of: {}", format_vocabulary(.expected))]
    UnrecognizedCategory {
        field: String,
        value: String,
        expected: Vec<String>,
    },

    #[error("Invalid numeric value for column '{field}': {reason}")]
    InvalidNumeric { field: String, reason: String },

    #[error("Feature order mismatch: {0}")]
    FeatureOrder(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SafeHeartError {
    /// Errors caused by the submitted input rather than by the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SafeHeartError::UnrecognizedCategory { .. } | SafeHeartError::InvalidNumeric { .. }
        )
    }
}

fn format_vocabulary(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
    format!("[{}]", quoted.join(" "))
}

impl From<polars::error::PolarsError> for SafeHeartError {
    fn from(err: polars::error::PolarsError) -> Self {
        SafeHeartError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for SafeHeartError {
    fn from(err: serde_json::Error) -> Self {
        SafeHeartError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for SafeHeartError {
    fn from(err: ndarray::ShapeError) -> Self {
        SafeHeartError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
