mod candidate;
mod date;
mod isbn;
mod rating;
mod record;
mod series;

pub use self::candidate::SearchCandidate;
pub use self::date::PublishDate;
pub use self::isbn::Isbn;
pub use self::rating::Rating;
pub use self::record::MetadataRecord;
pub use self::series::Series;

/// Canonical URL of a subject (book detail) page.
pub fn subject_url(id: &str) -> String {
    format!("https://book.douban.com/subject/{id}/")
}
