//! Common error types for the predictive maintenance service

use thiserror::Error;

/// Common result type for pdm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the normalizer, the models and the web flows
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or malformed single-record field, or a bad cell in a batch row
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uploaded table is structurally unusable (missing required columns)
    #[error("Schema error: {0}")]
    Schema(String),

    /// Classifier invocation failed or returned an unusable class code
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Model artifact could not be loaded or is inconsistent
    #[error("Model error: {0}")]
    Model(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}
