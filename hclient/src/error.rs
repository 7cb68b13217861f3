//! Error taxonomy for platform calls
//!
//! Every failure is returned to the caller as an [`HClientError`]. Errors are
//! `Clone` because a single failed credential refresh is handed to every task
//! that was waiting on it.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HClientError>;

/// Errors produced by the client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HClientError {
    /// Credential acquisition or refresh failed permanently
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Bad input, detected locally or rejected by the platform
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced object, record or owner does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport-level failure (connect, timeout, broken body)
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-2xx answer from the platform
    #[error("upstream error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// A 2xx response whose body did not have the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Invalid configuration or HTTP client construction failure
    #[error("configuration error: {0}")]
    Config(String),
}

impl HClientError {
    /// Check if this error came from the authorization layer
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Check if the platform reported a missing object or record
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if the input was rejected
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for HClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
