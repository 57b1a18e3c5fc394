//! Candidate scoring and ranking.
//!
//! Each candidate gets a weighted similarity score against the query:
//! title 0.6, author overlap 0.3, identifier 0.1. An exact ISBN match is
//! definitive and short-circuits to a perfect 1.0 no matter what the text
//! comparison says. Components the query doesn't carry (no authors, no
//! identifier) drop out and the remaining weights renormalize, so a
//! title-only query still spans the full [0, 1] range; when the query
//! *does* carry an identifier its weight always stays in the denominator,
//! keeping every fuzzy-text score strictly below the exact-match 1.0.
//! Result rows rarely display an identifier, so a row surfaced by an
//! identifier-only query that shows none is presumed to be the site's
//! exact hit. The sort is stable: equal scores keep the site's own order.

use crate::normalize::tokens;
use crate::query::Query;
use crate::similarity::Similarity;
use douban_extract::SearchCandidate;
use std::collections::HashSet;
use tracing::trace;

const TITLE_WEIGHT: f32 = 0.6;
const AUTHOR_WEIGHT: f32 = 0.3;
const ISBN_WEIGHT: f32 = 0.1;

/// Score for a row surfaced by an identifier-only query that displays no
/// identifier of its own: the site matched the identifier server-side, so
/// the hit is presumed. Clears the default acceptance threshold but stays
/// below a verified exact match.
const IDENTIFIER_TRUST: f32 = 0.8;

/// A candidate paired with its score against the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: SearchCandidate,
    /// Weighted similarity in [0, 1].
    pub score: f32,
}

/// Score and sort candidates, best first. Deterministic and stable.
pub fn rank(query: &Query, candidates: Vec<SearchCandidate>, similarity: &dyn Similarity) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = score_candidate(query, &candidate, similarity);
            trace!(id = candidate.id, title = candidate.title, score, "scored candidate");
            RankedCandidate { candidate, score }
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

fn score_candidate(query: &Query, candidate: &SearchCandidate, similarity: &dyn Similarity) -> f32 {
    // An exact identifier match is definitive; fuzzy text can't beat it.
    if let (Some(query_isbn), Some(candidate_isbn)) = (&query.isbn, &candidate.isbn)
        && query_isbn.to_isbn13() == candidate_isbn.to_isbn13()
    {
        return 1.0;
    }
    let mut score = 0.0;
    let mut weight = 0.0;
    if let Some(title) = query.title.as_deref() {
        score += TITLE_WEIGHT * similarity.score(title, &candidate.title);
        weight += TITLE_WEIGHT;
    }
    if !query.authors.is_empty() {
        weight += AUTHOR_WEIGHT;
        if let Some(line) = candidate.author_line.as_deref() {
            score += AUTHOR_WEIGHT * author_overlap(&query.authors, line);
        }
    }
    if query.isbn.is_some() {
        // The identifier component participates whenever the query carries
        // one, so no fuzzy-text score can reach the exact-match 1.0. A row
        // displaying a different identifier contributes nothing here and
        // scores accordingly.
        weight += ISBN_WEIGHT;
        if query.title.is_none() && query.authors.is_empty() && candidate.isbn.is_none() {
            // Identifier-only query and the row shows no identifier to
            // verify against: presume the site's exact-identifier hit.
            return IDENTIFIER_TRUST;
        }
    }
    if weight == 0.0 { 0.0 } else { score / weight }
}

/// Fraction of query authors with any token overlap against the
/// candidate's displayed author/publication line.
fn author_overlap(authors: &[String], line: &str) -> f32 {
    let line_tokens: HashSet<String> = tokens(line).into_iter().collect();
    if line_tokens.is_empty() {
        return 0.0;
    }
    let matched = authors.iter().filter(|author| tokens(author).iter().any(|t| line_tokens.contains(t))).count();
    matched as f32 / authors.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::TokenSetOverlap;

    fn candidate(id: &str, title: &str, author_line: Option<&str>) -> SearchCandidate {
        SearchCandidate {
            id: id.to_string(),
            title: title.to_string(),
            author_line: author_line.map(str::to_string),
            cover_url: None,
            rating: None,
            isbn: None,
        }
    }

    #[test]
    fn best_title_match_ranks_first() {
        let query = Query::from_title("Dune").with_author("Frank Herbert");
        let candidates = vec![
            candidate("1", "Dune Messiah", Some("Frank Herbert / Ace / 1969")),
            candidate("2", "Dune", Some("Frank Herbert / Ace / 1965")),
            candidate("3", "The Santaroga Barrier", Some("Frank Herbert")),
        ];
        let ranked = rank(&query, candidates, &TokenSetOverlap);
        assert_eq!(ranked[0].candidate.id, "2");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn ranking_is_deterministic_and_stable() {
        let query = Query::from_title("Collected Stories");
        // Identical titles score identically; site order must survive.
        let candidates = vec![
            candidate("first", "Collected Stories", None),
            candidate("second", "Collected Stories", None),
            candidate("third", "Collected Stories", None),
        ];
        for _ in 0..3 {
            let ranked = rank(&query, candidates.clone(), &TokenSetOverlap);
            let order: Vec<&str> = ranked.iter().map(|r| r.candidate.id.as_str()).collect();
            assert_eq!(order, vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn exact_isbn_outranks_perfect_title_match() {
        let isbn: douban_extract::Isbn = "9780441013593".parse().unwrap();
        let query = Query::from_title("Dune").with_isbn(isbn.clone());
        let mut with_isbn = candidate("isbn-hit", "Completely Different Title", None);
        with_isbn.isbn = Some(isbn);
        let candidates = vec![candidate("title-hit", "Dune", None), with_isbn];
        let ranked = rank(&query, candidates, &TokenSetOverlap);
        assert_eq!(ranked[0].candidate.id, "isbn-hit");
        assert_eq!(ranked[0].score, 1.0);
        assert!(ranked[1].score < 1.0);
    }

    #[test]
    fn fuzzy_text_cannot_tie_an_exact_identifier_match() {
        // Perfect title and author overlap, listed first by the site; the
        // exact-identifier row must still win, not tie into site order.
        let isbn: douban_extract::Isbn = "9780441013593".parse().unwrap();
        let query = Query::from_title("Dune").with_author("Frank Herbert").with_isbn(isbn.clone());
        let mut exact = candidate("exact", "Dune: The Graphic Novel", None);
        exact.isbn = Some(isbn);
        let fuzzy = candidate("fuzzy", "Dune", Some("Frank Herbert / Ace / 1965"));
        let ranked = rank(&query, vec![fuzzy, exact], &TokenSetOverlap);
        assert_eq!(ranked[0].candidate.id, "exact");
        assert_eq!(ranked[0].score, 1.0);
        assert!(ranked[1].score < 1.0);
    }

    #[test]
    fn isbn_only_query_trusts_rows_without_displayed_identifier() {
        // Result rows rarely display identifiers; an identifier-only query
        // must still score the site's hits above the acceptance range.
        let query = Query::default().with_isbn("9780441013593".parse().unwrap());
        let plain = candidate("plain", "Dune", Some("Frank Herbert / Ace / 1965"));
        let mut contradicting = candidate("wrong", "Dune", None);
        contradicting.isbn = Some("9787536692930".parse().unwrap());
        let ranked = rank(&query, vec![contradicting, plain], &TokenSetOverlap);
        assert_eq!(ranked[0].candidate.id, "plain");
        assert!(ranked[0].score > 0.4);
        assert!(ranked[0].score < 1.0);
        // A row displaying a *different* identifier is a contradiction.
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn isbn_match_across_forms() {
        // Query holds the ISBN-10, candidate exposes the ISBN-13.
        let query = Query::default().with_isbn("0441013597".parse().unwrap());
        let mut c = candidate("x", "Dune", None);
        c.isbn = Some("9780441013593".parse().unwrap());
        let ranked = rank(&query, vec![c], &TokenSetOverlap);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn title_only_query_spans_full_range() {
        let query = Query::from_title("Dune");
        let ranked = rank(&query, vec![candidate("1", "Dune", None)], &TokenSetOverlap);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn author_overlap_raises_the_score() {
        let query = Query::from_title("Dune").with_author("Frank Herbert");
        let candidates = vec![
            candidate("no-author", "Dune", Some("Someone Else / 2001")),
            candidate("with-author", "Dune", Some("Frank Herbert / Ace / 1965")),
        ];
        let ranked = rank(&query, candidates, &TokenSetOverlap);
        assert_eq!(ranked[0].candidate.id, "with-author");
    }

    #[test]
    fn cjk_author_line_matches() {
        let query = Query::from_title("沙丘").with_author("弗兰克·赫伯特");
        let candidates = vec![candidate("zh", "沙丘", Some("[美] 弗兰克·赫伯特 / 江苏凤凰文艺出版社 / 2017-2"))];
        let ranked = rank(&query, candidates, &TokenSetOverlap);
        assert_eq!(ranked[0].score, 1.0);
    }

    #[test]
    fn empty_candidate_list() {
        let query = Query::from_title("Dune");
        assert!(rank(&query, Vec::new(), &TokenSetOverlap).is_empty());
    }
}
