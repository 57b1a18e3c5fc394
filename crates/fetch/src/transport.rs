//! The injected transport capability.
//!
//! The engine never opens sockets itself: the host supplies something that
//! can turn a URL into bytes (and with it TLS, proxying, cookies and
//! whatever site-specific headers keep the bot detection quiet). Redirects
//! are *not* the transport's job; it reports them and the fetcher decides
//! whether to follow.

use crate::error::Result;
use async_trait::async_trait;

/// One HTTP exchange, as seen by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Location` header, when the status is a redirect.
    pub location: Option<String>,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, location: None, body: body.into() }
    }

    /// A redirect to `location`.
    pub fn redirect(status: u16, location: impl Into<String>) -> Self {
        Self { status, location: Some(location.into()), body: Vec::new() }
    }
}

/// Host-supplied capability for a single GET exchange.
///
/// Implementations signal transport-level failures as
/// [`NetworkUnreachable`](crate::error::ErrorKind::NetworkUnreachable) (or
/// [`Timeout`](crate::error::ErrorKind::Timeout) if they enforce their own
/// deadline); protocol-level outcomes travel in [`RawResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse>;
}
