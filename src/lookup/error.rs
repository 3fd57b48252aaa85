//! Error types for HTTP transport and remote lookups.

use thiserror::Error;

/// Error type for HTTP operations.
///
/// Describes what went wrong without dictating recovery strategy.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Failure of a single remote lookup.
///
/// Every variant is transient: the caller records it as an error status
/// and tries again on its next cadence. The variants are kept apart so
/// they can be logged distinctly.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup did not complete within its time budget.
    #[error("lookup timed out")]
    Timeout,

    /// The remote answered with a non-success status code.
    #[error("lookup endpoint returned HTTP {status}")]
    Status {
        /// The returned status code
        status: http::StatusCode,
    },

    /// The remote answered 2xx but the body is not a complete record.
    #[error("malformed lookup response: {reason}")]
    Malformed {
        /// Parse failure description
        reason: String,
    },

    /// No response was received (DNS, connect, TLS or invalid URL failure).
    #[error("lookup transport failure: {0}")]
    Connection(#[source] HttpError),
}

impl LookupError {
    /// Returns `true` for failures where the remote answered but the
    /// answer was unusable (bad status or malformed body).
    #[must_use]
    pub const fn is_protocol(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Malformed { .. })
    }

    /// Returns `true` if the lookup exceeded its time budget.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl From<HttpError> for LookupError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Timeout => Self::Timeout,
            other => Self::Connection(other),
        }
    }
}
