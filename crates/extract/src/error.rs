//! Extraction Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. None of them are transient: the markup either matches the
/// site's current layout or it doesn't.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The HTML is not a Douban subject page (no subject id anywhere).
    #[display("invalid subject page: missing required structure")]
    InvalidDocument,
    /// A required field could not be found in the document.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
    /// A field was found but could not be parsed.
    #[display("failed to parse field '{field}', found value: {value}")]
    ParseError {
        /// The field that failed to parse.
        field: &'static str,
        /// The offending value.
        value: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Extraction is pure; a retry on the same markup cannot succeed.
        false
    }
}
