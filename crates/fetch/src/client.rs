//! The rate-limited, caching fetch client.

use crate::cache::ResponseCache;
use crate::error::{ErrorKind, Result};
use crate::pacer::Pacer;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Tunables for one [`RateLimitedFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Minimum spacing between any two outgoing requests.
    pub min_request_interval: Duration,
    /// Maximum age of a cached response before re-fetching.
    pub cache_ttl: Duration,
    /// Maximum number of cached responses.
    pub cache_capacity: usize,
    /// Deadline for a single transport exchange.
    pub timeout: Duration,
    /// Redirect hop budget.
    pub max_redirects: u8,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_request_interval: Duration::from_millis(1000),
            cache_ttl: Duration::from_secs(600),
            cache_capacity: 500,
            timeout: Duration::from_secs(30),
            max_redirects: 5,
        }
    }
}

/// Fetch wrapper enforcing request pacing and response caching.
///
/// One instance is shared by every resolution session talking to the site;
/// its pacing gate is the sole synchronization point between concurrent
/// resolutions. Cache state lives and dies with the instance; nothing is
/// persisted across process restarts.
pub struct RateLimitedFetcher {
    transport: Arc<dyn Transport>,
    cache: ResponseCache,
    pacer: Pacer,
    timeout: Duration,
    max_redirects: u8,
}

impl RateLimitedFetcher {
    pub fn new(transport: Arc<dyn Transport>, config: FetcherConfig) -> Self {
        Self {
            transport,
            cache: ResponseCache::new(config.cache_ttl, config.cache_capacity),
            pacer: Pacer::new(config.min_request_interval),
            timeout: config.timeout,
            max_redirects: config.max_redirects,
        }
    }

    /// Fetch a URL, consulting the cache first and pacing any network
    /// traffic. Redirects are followed transparently up to the hop budget;
    /// every hop is paced like a fresh request.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let key = normalize_url(url);
        if let Some(body) = self.cache.get(&key).await {
            debug!(url = key, "cache hit");
            return Ok(body);
        }
        let mut current = key.clone();
        for _ in 0..=self.max_redirects {
            self.pacer.wait_turn().await;
            let response = match tokio::time::timeout(self.timeout, self.transport.get(&current)).await {
                Ok(result) => result?,
                Err(_) => exn::bail!(ErrorKind::Timeout),
            };
            if (300..400).contains(&response.status) {
                let Some(location) = response.location else {
                    exn::bail!(ErrorKind::HttpStatus(response.status));
                };
                current = resolve_location(&current, &location);
                debug!(location = current, "following redirect");
                continue;
            }
            if !(200..300).contains(&response.status) {
                exn::bail!(ErrorKind::HttpStatus(response.status));
            }
            self.cache.insert(key, response.body.clone()).await;
            return Ok(response.body);
        }
        exn::bail!(ErrorKind::TooManyRedirects(self.max_redirects))
    }
}

/// Cache key normalization: byte-identical URLs modulo fragment, stray
/// whitespace and scheme/host case map to the same entry.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);
    match without_fragment.find("://") {
        Some(scheme_end) => {
            let after_scheme = scheme_end + 3;
            let host_end = without_fragment[after_scheme..]
                .find('/')
                .map(|i| after_scheme + i)
                .unwrap_or(without_fragment.len());
            let mut normalized = without_fragment[..host_end].to_ascii_lowercase();
            normalized.push_str(&without_fragment[host_end..]);
            normalized
        }
        None => without_fragment.to_string(),
    }
}

/// Resolve a `Location` header against the URL that produced it.
fn resolve_location(base: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    if let Some(rest) = location.strip_prefix('/') {
        if let Some(scheme_end) = base.find("://") {
            let after_scheme = scheme_end + 3;
            let host_end = base[after_scheme..].find('/').map(|i| after_scheme + i).unwrap_or(base.len());
            return format!("{}/{}", &base[..host_end], rest);
        }
    }
    match base.rfind('/') {
        Some(slash) if slash > base.find("://").map_or(0, |i| i + 2) => format!("{}/{}", &base[..slash], location),
        _ => format!("{}/{}", base.trim_end_matches('/'), location),
    }
}
