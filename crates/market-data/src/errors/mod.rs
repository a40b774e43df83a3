//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`ApiError`]: The main error enum for all remote market data operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur while talking to the remote market data API.
///
/// Each variant is classified into a [`RetryClass`] via the
/// [`retry_class`](Self::retry_class) method, which determines whether
/// [`RetryPolicy`](crate::RetryPolicy) will attempt the operation again.
///
/// Underlying causes are held behind `Arc` so the error can be cloned into
/// view-state snapshots handed to observers.
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// A request URL could not be constructed.
    /// The request is fundamentally invalid and retrying won't help.
    #[error("invalid request URL")]
    InvalidUrl,

    /// The server returned something unusable: a bad status without a
    /// structured error message, malformed top-level JSON, or a response
    /// missing an expected key. Often transient on this API.
    #[error("invalid response from server")]
    InvalidResponse,

    /// A structurally valid response failed to decode into a domain model.
    #[error("failed to decode response: {0}")]
    Decoding(Arc<serde_json::Error>),

    /// A transport-level failure (timeout, connection lost, DNS failure).
    #[error("network error: {0}")]
    Network(Arc<dyn std::error::Error + Send + Sync>),

    /// The server reported a structured error message in its status envelope.
    /// The request was understood and rejected - retrying won't help.
    #[error("API error: {0}")]
    Api(String),

    /// No network path is available at all.
    #[error("no internet connection")]
    NoConnection,
}

impl ApiError {
    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::WithBackoff`]: Retry with exponential backoff
    /// - [`RetryClass::Never`]: Don't retry, the error is terminal
    ///
    /// # Examples
    ///
    /// ```
    /// use coinboard_market_data::{ApiError, RetryClass};
    ///
    /// let error = ApiError::InvalidResponse;
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = ApiError::Api("Invalid API key".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Transient errors - retry with backoff
            Self::Network(_) | Self::InvalidResponse => RetryClass::WithBackoff,

            // Terminal errors - never retry
            Self::InvalidUrl | Self::Decoding(_) | Self::Api(_) | Self::NoConnection => {
                RetryClass::Never
            }
        }
    }

    /// Whether a retry with backoff may succeed.
    pub fn is_retryable(&self) -> bool {
        self.retry_class() == RetryClass::WithBackoff
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decoding(Arc::new(err))
    }
}
