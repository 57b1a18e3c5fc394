//! Rate-limited, response-caching fetch layer for the metadata engine.
//!
//! The actual HTTP transport is an injected capability ([`Transport`]);
//! this crate wraps it with everything the catalog site's anti-scraping
//! posture demands:
//!
//! - request pacing: a shared gate spaces outgoing requests at a minimum
//!   interval, across however many resolution sessions are in flight;
//! - a TTL + bounded-capacity response cache keyed by normalized URL;
//! - transparent redirect following with a hop budget;
//! - a hard per-exchange deadline.
//!
//! Concurrent callers only synchronize at the pacing gate and the cache
//! lock; their parsing and ranking work proceeds independently once a
//! fetch completes.

mod cache;
mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod pacer;
mod transport;

pub use crate::cache::ResponseCache;
pub use crate::client::{FetcherConfig, RateLimitedFetcher, normalize_url};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockTransport;
pub use crate::pacer::Pacer;
pub use crate::transport::{RawResponse, Transport};
