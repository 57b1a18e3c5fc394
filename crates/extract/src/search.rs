//! Search-results page parsing.
//!
//! Turns the server-rendered book search list into candidates, in the order
//! the site presents them (the site's own relevance ranking). Absence of
//! results is a valid outcome: malformed or unexpected markup yields an
//! empty list, never an error.

use crate::consts;
use crate::models::{Isbn, Rating, SearchCandidate};
use scraper::{ElementRef, Html};
use tracing::instrument;

/// Parse a search-results page into candidates, in site order.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn parse_search_results(html: &str) -> Vec<SearchCandidate> {
    let document = Html::parse_document(html);
    document.select(&consts::SEARCH_ITEM_SELECTOR).filter_map(|item| parse_item(&item)).collect()
}

fn parse_item(item: &ElementRef<'_>) -> Option<SearchCandidate> {
    // A row without a subject link is an ad or layout junk; skip it.
    let id = subject_id(item)?;
    let title_element = item.select(&consts::SEARCH_TITLE_SELECTOR).next()?;
    let title = title_element
        .value()
        .attr("title")
        .map(str::to_string)
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| title_element.text().collect::<String>())
        .trim()
        .to_string();
    if title.is_empty() {
        return None;
    }
    let author_line = item
        .select(&consts::SEARCH_PUB_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|line| !line.is_empty());
    let rating = item
        .select(&consts::SEARCH_RATING_SELECTOR)
        .next()
        .and_then(|el| el.text().collect::<String>().parse::<Rating>().ok());
    let cover_url = item
        .select(&consts::SEARCH_THUMB_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);
    let isbn = author_line.as_deref().and_then(scan_for_isbn);
    Some(SearchCandidate {
        id,
        title,
        author_line,
        cover_url,
        rating,
        isbn,
    })
}

fn subject_id(item: &ElementRef<'_>) -> Option<String> {
    for anchor in item.select(&consts::ANCHOR_SELECTOR) {
        if let Some(href) = anchor.value().attr("href")
            && let Some(captures) = consts::SUBJECT_URL_REGEX.captures(href)
        {
            return Some(captures[1].to_string());
        }
    }
    None
}

/// Result rows don't normally display identifiers, but the publication line
/// occasionally carries one; an exact hit there outranks any fuzzy match.
fn scan_for_isbn(line: &str) -> Option<Isbn> {
    line.split('/').find_map(|segment| segment.trim().parse::<Isbn>().ok())
}
