//! In-memory transport for testing.
//!
//! Routes are fixed at construction; every call is counted, so tests can
//! assert on the exact number of network exchanges (cache idempotence, the
//! no-fetch-on-invalid-query property, and so on). Enable the `mock`
//! feature to use it from a downstream crate's tests.

use crate::error::{ErrorKind, Result};
use crate::transport::{RawResponse, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockOutcome {
    Page(Vec<u8>),
    Status(u16),
    Redirect(String),
    Error(ErrorKind),
    /// Never responds; pairs with a paused tokio clock to exercise the
    /// fetcher's deadline.
    Hang,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    routes: HashMap<String, MockOutcome>,
    hits: AtomicUsize,
}

impl MockTransport {
    /// A transport serving 200 responses for the given URL → body pairs.
    pub fn with_pages(pages: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        pages.into_iter().fold(Self::default(), |transport, (url, body)| transport.with_page(url, body))
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(url.into(), MockOutcome::Page(body.into()));
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.routes.insert(url.into(), MockOutcome::Status(status));
        self
    }

    pub fn with_redirect(mut self, url: impl Into<String>, location: impl Into<String>) -> Self {
        self.routes.insert(url.into(), MockOutcome::Redirect(location.into()));
        self
    }

    pub fn with_error(mut self, url: impl Into<String>, kind: ErrorKind) -> Self {
        self.routes.insert(url.into(), MockOutcome::Error(kind));
        self
    }

    pub fn with_hang(mut self, url: impl Into<String>) -> Self {
        self.routes.insert(url.into(), MockOutcome::Hang);
        self
    }

    /// Total number of `get` calls made so far.
    pub fn calls(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<RawResponse> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        match self.routes.get(url) {
            Some(MockOutcome::Page(body)) => Ok(RawResponse::ok(body.clone())),
            Some(MockOutcome::Status(status)) => Ok(RawResponse { status: *status, location: None, body: Vec::new() }),
            Some(MockOutcome::Redirect(location)) => Ok(RawResponse::redirect(302, location.clone())),
            Some(MockOutcome::Error(kind)) => Err(exn::Exn::from(kind.clone())),
            Some(MockOutcome::Hang) => {
                tokio::time::sleep(Duration::from_secs(86_400)).await;
                Ok(RawResponse::ok(Vec::new()))
            }
            // Unrouted URLs behave like a missing page, not a test panic;
            // resolution flows treat 404s as tolerable search failures.
            None => Ok(RawResponse { status: 404, location: None, body: Vec::new() }),
        }
    }
}
