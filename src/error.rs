//! Error types for sitedeploy.

use thiserror::Error;

use crate::staging::StagingError;

/// Common error type for sitedeploy.
#[derive(Error, Debug)]
pub enum DeployerError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Staging tree rejected an operation.
    #[error(transparent)]
    Staging(#[from] StagingError),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// GitHub API error.
    ///
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    GitHub(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DeployerError {
    fn from(e: reqwest::Error) -> Self {
        DeployerError::GitHub(format!("network error: {e}"))
    }
}

/// Result type alias for sitedeploy operations.
pub type Result<T> = std::result::Result<T, DeployerError>;
