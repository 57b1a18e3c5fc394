//! Query building.
//!
//! Turns noisy user input into search query strings, in priority order:
//! exact-identifier first, then title + author, then bare title as a
//! fallback when multiple authors make the combined query unreliable.
//! Callers stop at the first query whose top candidate clears the
//! acceptance threshold.

use crate::error::{ErrorKind, Result};
use crate::normalize::normalize;
use douban_extract::Isbn;

/// Imprecise user-supplied book identity. Resolution-scoped and transient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub title: Option<String>,
    /// Authors in the user's order; only the first drives query building,
    /// the rest still count toward ranking.
    pub authors: Vec<String>,
    pub isbn: Option<Isbn>,
}

impl Query {
    pub fn from_title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()), ..Self::default() }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_isbn(mut self, isbn: Isbn) -> Self {
        self.isbn = Some(isbn);
        self
    }

    /// A query is resolvable when it has a title or an ISBN to search by.
    pub fn is_resolvable(&self) -> bool {
        self.isbn.is_some() || self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Build search query strings in priority order. Never empty for a
    /// resolvable query.
    ///
    /// # Errors
    ///
    /// [`InvalidQuery`](ErrorKind::InvalidQuery) when the query has neither
    /// title nor ISBN; no network activity has happened at that point.
    pub fn build_queries(&self) -> Result<Vec<String>> {
        if !self.is_resolvable() {
            exn::bail!(ErrorKind::InvalidQuery);
        }
        let mut queries: Vec<String> = Vec::new();
        if let Some(isbn) = &self.isbn {
            queries.push(isbn.digits().to_string());
        }
        if let Some(raw_title) = self.title.as_deref().filter(|t| !t.trim().is_empty()) {
            // Normalization can eat the entire title (e.g. one long
            // parenthetical); fall back to the raw text in that case.
            let title = match normalize(raw_title) {
                t if t.is_empty() => raw_title.trim().to_string(),
                t => t,
            };
            let first_author = self.authors.first().map(|a| normalize(a)).filter(|a| !a.is_empty());
            match &first_author {
                Some(author) => queries.push(format!("{title} {author}")),
                None => queries.push(title.clone()),
            }
            // The site's search copes badly with multi-author strings;
            // keep a bare-title fallback when there is more than one.
            if self.authors.len() > 1 {
                queries.push(title);
            }
        }
        queries.dedup();
        Ok(queries)
    }
}
