//! Hybrid scoring and ranking of search candidates.
//!
//! A candidate's score is a weighted sum of its vector similarity and a
//! keyword bonus. Inclusion is an OR-gate: a title match bypasses the
//! similarity floor, and a similarity above the floor bypasses the keyword.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use super::config::SearchConfig;
use crate::types::{RankedSnippet, SearchCandidate};

/// Weighted blend of vector similarity and title keyword match.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridScorer {
    /// Weight for vector similarity.
    pub vector_weight: f64,
    /// Bonus for a title match.
    pub keyword_weight: f64,
    /// Inclusion threshold for candidates without a title match.
    pub similarity_floor: f64,
}

impl Default for HybridScorer {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl HybridScorer {
    /// Create a scorer from search configuration.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            vector_weight: config.vector_weight,
            keyword_weight: config.keyword_weight,
            similarity_floor: config.similarity_floor,
        }
    }

    /// Override the similarity floor.
    pub fn with_floor(mut self, similarity_floor: f64) -> Self {
        self.similarity_floor = similarity_floor;
        self
    }

    /// Hybrid score: `similarity * vector_weight + (match ? keyword_weight : 0)`.
    pub fn score(&self, vector_similarity: f64, title_matches: bool) -> f64 {
        let keyword = if title_matches { self.keyword_weight } else { 0.0 };
        vector_similarity * self.vector_weight + keyword
    }

    /// Whether a candidate passes the OR-gate.
    pub fn includes(&self, candidate: &SearchCandidate) -> bool {
        candidate.title_matches
            || candidate
                .vector_similarity
                .is_some_and(|similarity| similarity > self.similarity_floor)
    }

    /// Rank candidates for a query.
    ///
    /// A blank query skips scoring and returns the most recent candidates.
    /// Otherwise candidates passing the OR-gate are ordered by score
    /// descending, then most recently updated, then id. Candidates without a
    /// stored embedding score as similarity zero.
    pub fn rank_candidates(&self, query: &str, candidates: Vec<SearchCandidate>, limit: usize) -> Vec<RankedSnippet> {
        if query.trim().is_empty() {
            return rank_by_recency(candidates, limit);
        }

        let mut scored: Vec<RankedSnippet> = candidates
            .into_iter()
            .filter(|candidate| self.includes(candidate))
            .map(|candidate| {
                let score = self.score(candidate.vector_similarity.unwrap_or(0.0), candidate.title_matches);
                RankedSnippet {
                    score: Some(score),
                    vector_similarity: candidate.vector_similarity,
                    title_matches: candidate.title_matches,
                    snippet: candidate.snippet,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            OrderedFloat(b.score.unwrap_or(0.0))
                .cmp(&OrderedFloat(a.score.unwrap_or(0.0)))
                .then_with(|| by_recency(a, b))
        });
        scored.truncate(limit);
        scored
    }
}

/// Keyword-only ranking used when no query embedding is available.
///
/// Keeps title matches, most recently updated first, with no similarity
/// component.
pub fn rank_by_keyword(candidates: Vec<SearchCandidate>, limit: usize) -> Vec<RankedSnippet> {
    let matching = candidates.into_iter().filter(|c| c.title_matches).collect();
    rank_by_recency(matching, limit)
}

/// Most recently updated first, ignoring similarity.
pub fn rank_by_recency(candidates: Vec<SearchCandidate>, limit: usize) -> Vec<RankedSnippet> {
    let mut ranked: Vec<RankedSnippet> = candidates
        .into_iter()
        .map(|candidate| RankedSnippet {
            snippet: candidate.snippet,
            score: None,
            vector_similarity: None,
            title_matches: candidate.title_matches,
        })
        .collect();

    ranked.sort_by(by_recency);
    ranked.truncate(limit);
    ranked
}

fn by_recency(a: &RankedSnippet, b: &RankedSnippet) -> Ordering {
    b.snippet
        .updated_at
        .cmp(&a.snippet.updated_at)
        .then_with(|| a.snippet.id.cmp(&b.snippet.id))
}
