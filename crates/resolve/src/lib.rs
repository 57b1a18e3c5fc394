//! Book metadata resolution against the Douban catalog.
//!
//! Ties the engine together: imprecise book identity in, at most one
//! confirmed [`MetadataRecord`](douban_extract::MetadataRecord) out. A
//! resolution builds prioritized search queries, fetches and ranks each
//! results page through the shared rate-limited fetcher, and commits to the
//! first candidate that clears the acceptance threshold (falling back to
//! the best candidate seen if it clears the viability floor).
//!
//! ```no_run
//! use douban_config::Settings;
//! use douban_resolve::{Query, Resolver};
//! # use std::sync::Arc;
//! # async fn run(transport: Arc<dyn douban_fetch::Transport>) -> douban_resolve::Result<()> {
//! let resolver = Resolver::new(transport, Settings::default());
//! let query = Query::from_title("Dune").with_author("Frank Herbert");
//! if let Some(record) = resolver.resolve(&query).await?.record() {
//!     println!("{} ({})", record.title, record.url());
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
mod normalize;
mod query;
mod rank;
mod resolver;
mod similarity;

pub use crate::error::{Error, ErrorKind, Result};
pub use crate::normalize::{normalize, tokens};
pub use crate::query::Query;
pub use crate::rank::{RankedCandidate, rank};
pub use crate::resolver::{Resolution, Resolved, Resolver, search_url};
pub use crate::similarity::{EditDistance, Similarity, TokenSetOverlap};
