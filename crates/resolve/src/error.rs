//! Resolution Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Note that "no match found" is *not* here: it is a
//! legitimate outcome, modeled as [`Resolution::NotFound`](crate::Resolution).

use derive_more::{Display, Error};

/// A resolution error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Search-phase fetch failures never surface here; the resolver tolerates
/// them and moves on to the next query. Only failures after a candidate has
/// been committed to are fatal.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The query carries neither a title nor an ISBN; nothing was fetched.
    #[display("query has neither title nor ISBN")]
    InvalidQuery,
    /// The chosen candidate's detail page could not be fetched.
    #[display("failed to fetch detail page {url}")]
    DetailFetch {
        /// The detail page URL.
        url: String,
    },
    /// The chosen candidate's detail page could not be parsed; either the
    /// site layout changed or the candidate link is broken.
    #[display("failed to parse detail page {url}")]
    DetailParse {
        /// The detail page URL.
        url: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            // Transient transport trouble; the same candidate may resolve
            // on the next attempt.
            ErrorKind::DetailFetch { .. } => true,
            // Layout mismatches and caller errors stay broken until
            // something outside this process changes.
            ErrorKind::DetailParse { .. } | ErrorKind::InvalidQuery => false,
        }
    }
}
