//! Pluggable string-similarity strategies.
//!
//! The ranker only needs "how alike are these two titles, 0 to 1"; the
//! specific algorithm is swappable without touching the resolution flow.

use crate::normalize::{normalize, tokens};
use std::collections::HashSet;

/// A symmetric similarity score in [0, 1] between two pieces of free text.
pub trait Similarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f32;
}

/// Token-set Jaccard overlap after normalization. Word-order insensitive,
/// which suits titles quoted in inconsistent order ("Dune Messiah" vs
/// "Messiah, Dune"). The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSetOverlap;

impl Similarity for TokenSetOverlap {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a: HashSet<String> = tokens(a).into_iter().collect();
        let b: HashSet<String> = tokens(b).into_iter().collect();
        if a.is_empty() && b.is_empty() {
            return 0.0;
        }
        let intersection = a.intersection(&b).count();
        let union = a.union(&b).count();
        intersection as f32 / union as f32
    }
}

/// Normalized Levenshtein distance over normalized text. Order sensitive;
/// better at catching typos than [`TokenSetOverlap`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance;

impl Similarity for EditDistance {
    fn score(&self, a: &str, b: &str) -> f32 {
        let a = normalize(a);
        let b = normalize(b);
        if a.is_empty() && b.is_empty() {
            return 0.0;
        }
        strsim::normalized_levenshtein(&a, &b) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Dune", "Dune", 1.0)]
    #[case("Dune", "dune (deluxe edition)", 1.0)]
    #[case("Dune", "Elantris", 0.0)]
    #[case("", "", 0.0)]
    fn token_set_exact_cases(#[case] a: &str, #[case] b: &str, #[case] expected: f32) {
        assert_eq!(TokenSetOverlap.score(a, b), expected);
    }

    #[test]
    fn token_set_partial_overlap() {
        let score = TokenSetOverlap.score("The Dispossessed", "The Dispossessed: An Ambiguous Utopia");
        assert!(score > 0.3 && score < 1.0);
    }

    #[test]
    fn token_set_is_order_insensitive() {
        assert_eq!(TokenSetOverlap.score("Dune Messiah", "Messiah, Dune"), 1.0);
    }

    #[test]
    fn token_set_handles_cjk_titles() {
        assert_eq!(TokenSetOverlap.score("沙丘", "沙丘"), 1.0);
        assert!(TokenSetOverlap.score("沙丘", "沙丘救世主") > 0.0);
    }

    #[test]
    fn edit_distance_tolerates_typos() {
        assert!(EditDistance.score("Neuromancer", "Neuromancre") > 0.8);
        assert_eq!(EditDistance.score("Dune", "Dune"), 1.0);
    }

    #[test]
    fn strategies_are_object_safe() {
        let strategies: Vec<Box<dyn Similarity>> = vec![Box::new(TokenSetOverlap), Box::new(EditDistance)];
        for strategy in &strategies {
            assert_eq!(strategy.score("same", "same"), 1.0);
        }
    }
}
