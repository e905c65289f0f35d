//! Hybrid scoring: vector similarity plus a keyword-overlap boost.

use std::cmp::Ordering;
use std::collections::HashSet;

/// Split `text` into lowercase keyword tokens.
///
/// Tokens are whitespace-separated runs with everything except letters,
/// digits and `_` removed. Empty tokens are dropped and repeats collapse to
/// their first occurrence.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty() && seen.insert(token.clone()))
        .collect()
}

/// Score one candidate against `query`.
pub fn score(query: &str, candidate_text: &str, distance: f32, boost_weight: f32) -> f32 {
    HybridScorer::new(query, boost_weight).score(candidate_text, distance)
}

/// Scorer bound to one query's tokens.
#[derive(Debug, Clone)]
pub struct HybridScorer {
    tokens: Vec<String>,
    boost_weight: f32,
}

impl HybridScorer {
    pub fn new(query: &str, boost_weight: f32) -> Self {
        Self {
            tokens: tokenize(query),
            boost_weight,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Fraction of query tokens found as substrings of the candidate text.
    pub fn keyword_overlap(&self, candidate_text: &str) -> f32 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let haystack = candidate_text.to_lowercase();
        let found = self
            .tokens
            .iter()
            .filter(|token| haystack.contains(token.as_str()))
            .count();
        found as f32 / self.tokens.len() as f32
    }

    /// `(1 - distance) + boost_weight * overlap`.
    pub fn score(&self, candidate_text: &str, distance: f32) -> f32 {
        (1.0 - distance) + self.boost_weight * self.keyword_overlap(candidate_text)
    }

    /// Score every candidate and sort best first.
    pub fn rank<T>(
        &self,
        mut candidates: Vec<Candidate<T>>,
        text_of: impl Fn(&T) -> String,
    ) -> Vec<Candidate<T>> {
        for candidate in &mut candidates {
            candidate.score = self.score(&text_of(&candidate.item), candidate.distance);
        }
        candidates.sort_by(Candidate::ranking);
        candidates
    }
}

/// A search hit awaiting selection.
#[derive(Debug, Clone)]
pub struct Candidate<T> {
    pub item: T,
    pub distance: f32,
    /// Index in the store's ascending-distance result.
    pub position: usize,
    pub score: f32,
}

impl<T> Candidate<T> {
    pub fn new(item: T, distance: f32, position: usize) -> Self {
        Self {
            item,
            distance,
            position,
            score: 1.0 - distance,
        }
    }

    pub fn is_admitted(&self, threshold: f32) -> bool {
        self.distance <= threshold
    }

    /// Score descending, then distance ascending, then store order.
    fn ranking(a: &Self, b: &Self) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then(a.distance.total_cmp(&b.distance))
            .then(a.position.cmp(&b.position))
    }
}

/// Admit candidates under `threshold`, keep the first `limit` in store
/// order, then rank them.
pub fn shortlist<T: Clone>(
    candidates: &[Candidate<T>],
    threshold: f32,
    limit: usize,
    scorer: &HybridScorer,
    text_of: impl Fn(&T) -> String,
) -> Vec<Candidate<T>> {
    let mut admitted: Vec<_> = candidates
        .iter()
        .filter(|c| c.is_admitted(threshold))
        .cloned()
        .collect();
    admitted.sort_by_key(|c| c.position);
    admitted.truncate(limit);
    scorer.rank(admitted, text_of)
}

#[cfg(test)]
#[path = "scorer_tests.rs"]
mod tests;
