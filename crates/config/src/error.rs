//! Configuration Error Types

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A setting is outside its valid range.
    #[display("invalid setting '{field}': {reason}")]
    Invalid {
        /// The offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// The configuration sources could not be read or deserialized.
    #[display("failed to load configuration")]
    Load,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A bad setting stays bad until the operator changes it.
        false
    }
}
