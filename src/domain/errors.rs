//! Domain error types
//!
//! This module defines the error hierarchy for Blackout. All errors are
//! domain-specific and don't expose third-party types: the HTTP client,
//! serde, and tokio errors are converted at the boundary where they occur.

use thiserror::Error;

/// Main Blackout error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum BlackoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Semantic classifier errors
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    /// Malformed or inconsistent OCR input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// The caller aborted processing between pipeline stages
    #[error("Processing cancelled by caller")]
    Cancelled,

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Semantic classifier errors
///
/// Errors that occur when calling the external semantic classifier.
/// These don't expose the underlying HTTP client types.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Failed to reach the classifier endpoint
    #[error("Failed to connect to classifier: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Classifier authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limit exceeded (HTTP 429)
    #[error("Classifier rate limit exceeded: {0}")]
    RateLimited(String),

    /// Request exceeded the bounded wait
    #[error("Classifier request timed out: {0}")]
    Timeout(String),

    /// Client error (4xx other than 429)
    #[error("Classifier client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Classifier server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Response body could not be interpreted at all
    #[error("Invalid classifier response: {0}")]
    InvalidResponse(String),
}

impl ClassifierError {
    /// Whether the retry policy may re-issue the failed call.
    ///
    /// Rate-limit signals are retryable per the backoff contract; a bounded
    /// wait expiring counts as a retryable failure as well. Everything else
    /// propagates immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Timeout(_))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BlackoutError {
    fn from(err: std::io::Error) -> Self {
        BlackoutError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BlackoutError {
    fn from(err: serde_json::Error) -> Self {
        BlackoutError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BlackoutError {
    fn from(err: toml::de::Error) -> Self {
        BlackoutError::Configuration(format!("TOML parse error: {err}"))
    }
}
