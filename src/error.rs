//! Error types for edinet-dl
//!
//! Errors here cover the paths that reject work before it reaches the
//! network: invalid parameters, configuration problems, and credential
//! resolution. Failures of an individual fetch are *not* errors — they are
//! captured as data in a [`crate::types::FetchOutcome`] and never propagate
//! past the fetch worker's boundary.

use thiserror::Error;

/// Result type alias for edinet-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for edinet-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed request inputs, rejected before any network call
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Human-readable description of what was rejected
        message: String,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// No usable credential could be resolved
    #[error("credential error: {0}")]
    Credential(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for an [`Error::InvalidParameter`] with the given message.
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            message: message.into(),
        }
    }
}
