//! Error types for the face tracker.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// Socket or file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model loading failed
    #[error("Model error: {0}")]
    ModelError(String),

    /// Model output had an unexpected shape or content
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Vehicle rejected a command or did not answer
    #[error("Vehicle error: {0}")]
    Vehicle(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
