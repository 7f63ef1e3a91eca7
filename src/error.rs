//! Error types for the det-score library.

use thiserror::Error;

/// Result type for det-score operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Error types that can occur while scoring detections.
#[derive(Error, Debug)]
pub enum ScoringError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A box that cannot be scored (inverted corners, negative size, non-finite value).
    #[error("Invalid bounding box: {0}")]
    InvalidBox(String),

    /// IoU threshold, score cutoff or cutoff range outside the accepted domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Predictions were not ordered by descending confidence.
    #[error("Predictions not sorted by descending confidence: {0}")]
    UnsortedPredictions(String),

    /// Parallel arrays (boxes and scores) of different lengths.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// No image records to aggregate.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
}
