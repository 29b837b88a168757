use std::collections::TryReserveError;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, KMeansError>;

/// Error types for the kmeanssp library
#[derive(Error, Debug)]
pub enum KMeansError {
    /// The number of clusters k is invalid (must be > 0)
    #[error("Invalid k value: {0}")]
    InvalidK(String),

    /// Not enough data points for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Model has not been fitted yet
    #[error("Model has not been fitted. Call fit() or fit_with_centroids() first.")]
    NotFitted,

    /// Dimension mismatch between data and model
    #[error("Dimension mismatch: {0}")]
    InvalidDimensions(String),

    /// Host input that is not a sequence of numeric sequences
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Memory for an accumulator, centroid or result buffer could not be obtained
    #[error("Allocation failed: {0}")]
    Allocation(String),
}

impl From<TryReserveError> for KMeansError {
    fn from(err: TryReserveError) -> Self {
        KMeansError::Allocation(err.to_string())
    }
}
