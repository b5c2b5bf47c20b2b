//! Error types for adapters.

use thiserror::Error;

use crate::draft::ValidationError;

/// Errors that can occur when talking to a monitoring backend.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Authentication failed or the session expired.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Endpoint not offered by this backend schema version.
    #[error("Feature not supported: {0}")]
    Unsupported(String),

    /// User input rejected before any request was made.
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),
}

impl AdapterError {
    /// True if the error means "this schema does not have that endpoint",
    /// which lets an auto-detecting backend try the other schema.
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, AdapterError::NotFound(_) | AdapterError::Unsupported(_))
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_connect() {
            AdapterError::Connection(err.to_string())
        } else if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Http(err.to_string())
        }
    }
}
