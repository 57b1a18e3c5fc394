//! Fetch Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A fetch error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request did not complete within the configured deadline.
    #[display("request timed out")]
    Timeout,
    /// The site answered outside the 200–299 range.
    #[display("unexpected HTTP status: {_0}")]
    HttpStatus(#[error(not(source))] u16),
    /// The transport could not reach the site at all.
    #[display("network unreachable: {_0}")]
    NetworkUnreachable(#[error(not(source))] String),
    /// Redirect chain exceeded the configured hop budget.
    #[display("too many redirects (limit {_0})")]
    TooManyRedirects(#[error(not(source))] u8),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ErrorKind::Timeout | ErrorKind::NetworkUnreachable(_) => true,
            ErrorKind::HttpStatus(status) => *status >= 500 || *status == 429,
            ErrorKind::TooManyRedirects(_) => false,
        }
    }
}
