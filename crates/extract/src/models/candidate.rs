use super::{Isbn, Rating, subject_url};

/// A single book identity surfaced by a search query, not yet confirmed as
/// the match. Lives for the duration of one resolution call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    /// Douban subject id (the numeric segment of the detail URL).
    pub id: String,
    /// Displayed title.
    pub title: String,
    /// The publication line under the title (author / translator /
    /// publisher / year), kept raw for the ranker to tokenize.
    pub author_line: Option<String>,
    /// Cover thumbnail URL.
    pub cover_url: Option<String>,
    /// Displayed average rating.
    pub rating: Option<Rating>,
    /// Identifier, on the rare occasions the result row exposes one.
    pub isbn: Option<Isbn>,
}

impl SearchCandidate {
    /// URL of this candidate's detail page.
    pub fn detail_url(&self) -> String {
        subject_url(&self.id)
    }
}
