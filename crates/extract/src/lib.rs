//! HTML parsing and metadata extraction for Douban book pages.
//!
//! Pure functions over markup, no network and no state. The two entry
//! points mirror the two page shapes the catalog serves:
//!
//! - [`parse_search_results`] turns a search-results page into
//!   [`SearchCandidate`]s, in site order; bad markup yields an empty list.
//! - [`parse_detail_page`] turns a subject page into a [`MetadataRecord`];
//!   only a missing title (or a page that isn't a subject page at all) is
//!   an error, every other field is optional.
//!
//! All structural assumptions about the site's markup live in this crate,
//! so a site redesign is contained here.

mod consts;
mod detail;
pub mod error;
pub mod models;
mod search;

use tracing::instrument;

pub use crate::detail::{DetailExtractor, InfoList, is_valid};
use crate::error::Result;
pub use crate::search::parse_search_results;

/// Easy, top-level entrypoint for the extraction of a [`MetadataRecord`]
/// from a subject page.
///
/// Validates the document as part of the extraction: a page without a
/// subject id fails with [`InvalidDocument`](error::ErrorKind::InvalidDocument),
/// one without a title with [`MissingField("title")`](error::ErrorKind::MissingField).
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_detail_page(html: &str) -> Result<MetadataRecord> {
    DetailExtractor::from_html(html).metadata()
}

// Re-exported for callers that only need the data model.
pub use crate::models::{Isbn, MetadataRecord, PublishDate, Rating, SearchCandidate, Series, subject_url};
