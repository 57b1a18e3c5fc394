use super::{Isbn, PublishDate, Rating, Series, subject_url};

/// Normalized bibliographic metadata for one book, extracted from a subject
/// page. Returned by value to the caller, which owns it thereafter.
///
/// Only `id` and `title` are guaranteed: `id` because extraction refuses to
/// produce a record without a source identifier, `title` because its absence
/// is the one fatal field error. Everything else is left unset when the page
/// doesn't carry it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord {
    /// Douban subject id, used for idempotent re-fetch.
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Authors in display order, translators appended after.
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub published: Option<PublishDate>,
    pub isbn13: Option<String>,
    pub isbn10: Option<String>,
    pub series: Option<Series>,
    /// Average rating on the 0–10 scale.
    pub rating: Option<Rating>,
    /// Site tags, deduplicated, in display order.
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

impl MetadataRecord {
    /// URL of the subject page this record was extracted from.
    pub fn url(&self) -> String {
        subject_url(&self.id)
    }

    /// Record both ISBN forms from a validated identifier.
    pub(crate) fn set_isbn(&mut self, isbn: &Isbn) {
        self.isbn13 = Some(isbn.to_isbn13());
        if let Isbn::Ten(ten) = isbn {
            self.isbn10 = Some(ten.clone());
        }
    }
}
