//! Transport Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A transport error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// A response with an unexpected HTTP status is **not** an error at this
/// layer; callers inspect [`HttpResponse::status`](crate::HttpResponse)
/// themselves.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request URL could not be parsed; fix the URL, don't retry.
    #[display("invalid request URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The underlying HTTP client could not be constructed.
    #[display("failed to build HTTP client")]
    Client,
    /// The host was unreachable or the connection failed mid-exchange.
    #[display("network failure")]
    Network,
    /// The exchange did not complete within its deadline.
    #[display("request timed out")]
    Timeout,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Timeout.to_string(), "request timed out");
        assert_eq!(
            ErrorKind::InvalidUrl("ht!tp://".to_string()).to_string(),
            "invalid request URL: ht!tp://"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Network.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(!ErrorKind::Client.is_retryable());
        assert!(!ErrorKind::InvalidUrl("x".to_string()).is_retryable());
    }
}
