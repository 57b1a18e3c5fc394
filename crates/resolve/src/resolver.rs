//! The resolution flow: queries out, one confirmed record back.
//!
//! A resolution walks the query list in priority order, fetching and
//! ranking one search page at a time. The first query whose top candidate
//! clears the acceptance threshold wins outright; otherwise the best
//! candidate seen across every query is used, provided it clears the
//! viability floor. Search-phase fetch failures are tolerated (the next
//! query may still succeed); failures after a candidate has been committed
//! to are fatal.

use crate::error::{ErrorKind, Result};
use crate::query::Query;
use crate::rank::{RankedCandidate, rank};
use crate::similarity::{Similarity, TokenSetOverlap};
use douban_config::Settings;
use douban_extract::{MetadataRecord, parse_detail_page, parse_search_results, subject_url};
use douban_fetch::{FetcherConfig, RateLimitedFetcher, Transport};
use exn::ResultExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Search endpoint, server-rendered book results.
const SEARCH_URL: &str = "https://search.douban.com/book/subject_search";

/// URL of the search-results page for a query string.
pub fn search_url(query: &str) -> String {
    format!("{SEARCH_URL}?search_text={}&cat=1001", urlencoding::encode(query))
}

/// The outcome of a successful resolution call. "No match" is a valid
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A candidate cleared the bar and its detail page parsed.
    Resolved(Resolved),
    /// Every query was tried and nothing viable came back.
    NotFound,
}

impl Resolution {
    /// The resolved record, if any.
    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Resolution::Resolved(resolved) => Some(&resolved.record),
            Resolution::NotFound => None,
        }
    }
}

/// A confirmed match with the score that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub record: MetadataRecord,
    /// The winning candidate's ranking score.
    pub score: f32,
}

/// The metadata resolution engine.
///
/// Holds the fetcher (shared pacing and cache), the similarity strategy,
/// and the scoring thresholds. One resolver serves any number of
/// sequential or concurrent [`resolve`](Self::resolve) calls.
pub struct Resolver {
    fetcher: Arc<RateLimitedFetcher>,
    similarity: Box<dyn Similarity>,
    settings: Settings,
}

impl Resolver {
    /// Build a resolver with its own fetcher on the given transport.
    pub fn new(transport: Arc<dyn Transport>, settings: Settings) -> Self {
        let fetcher = Arc::new(RateLimitedFetcher::new(transport, fetcher_config(&settings)));
        Self::with_fetcher(fetcher, settings)
    }

    /// Build a resolver around an existing fetcher, so several resolvers
    /// (or the host application's own fetches) share one pacing gate and
    /// cache.
    pub fn with_fetcher(fetcher: Arc<RateLimitedFetcher>, settings: Settings) -> Self {
        Self {
            fetcher,
            similarity: Box::new(TokenSetOverlap),
            settings,
        }
    }

    /// Swap the similarity strategy used for ranking.
    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    /// Resolve a query to at most one confirmed metadata record.
    ///
    /// # Errors
    ///
    /// [`InvalidQuery`](ErrorKind::InvalidQuery) before any network
    /// activity when the query is empty; [`DetailFetch`](ErrorKind::DetailFetch)
    /// / [`DetailParse`](ErrorKind::DetailParse) when the committed
    /// candidate's detail page fails. Search-phase fetch failures are
    /// logged and skipped, never surfaced.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &Query) -> Result<Resolution> {
        let queries = query.build_queries()?;
        let mut best: Option<RankedCandidate> = None;
        for search_text in &queries {
            let url = search_url(search_text);
            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(err) => {
                    warn!(query = search_text, error = %err, "search fetch failed, trying next query");
                    continue;
                }
            };
            let candidates = parse_search_results(&String::from_utf8_lossy(&body));
            debug!(query = search_text, count = candidates.len(), "search results");
            let Some(top) = rank(query, candidates, self.similarity.as_ref()).into_iter().next() else {
                continue;
            };
            if top.score >= self.settings.acceptance_threshold {
                debug!(id = top.candidate.id, score = top.score, "candidate accepted");
                return self.finish(top).await.map(Resolution::Resolved);
            }
            if best.as_ref().is_none_or(|b| top.score > b.score) {
                best = Some(top);
            }
        }
        // No query cleared the acceptance bar; settle for the best seen if
        // it is at least plausibly the right book.
        match best {
            Some(top) if top.score >= self.settings.min_viability_floor => {
                debug!(id = top.candidate.id, score = top.score, "falling back to best-so-far candidate");
                self.finish(top).await.map(Resolution::Resolved)
            }
            _ => Ok(Resolution::NotFound),
        }
    }

    /// Fetch a known subject id's detail page directly, bypassing search.
    #[instrument(skip(self))]
    pub async fn resolve_id(&self, id: &str) -> Result<MetadataRecord> {
        self.fetch_record(subject_url(id)).await
    }

    /// Commit to a candidate: fetch and parse its detail page.
    async fn finish(&self, top: RankedCandidate) -> Result<Resolved> {
        let record = self.fetch_record(top.candidate.detail_url()).await?;
        Ok(Resolved { record, score: top.score })
    }

    async fn fetch_record(&self, url: String) -> Result<MetadataRecord> {
        let body = self.fetcher.fetch(&url).await.or_raise(|| ErrorKind::DetailFetch { url: url.clone() })?;
        parse_detail_page(&String::from_utf8_lossy(&body)).or_raise(|| ErrorKind::DetailParse { url })
    }
}

fn fetcher_config(settings: &Settings) -> FetcherConfig {
    FetcherConfig {
        min_request_interval: Duration::from_millis(settings.min_request_interval_millis),
        cache_ttl: Duration::from_secs(settings.cache_ttl_seconds),
        cache_capacity: settings.cache_capacity,
        timeout: Duration::from_millis(settings.fetch_timeout_millis),
        max_redirects: settings.max_redirects,
    }
}
