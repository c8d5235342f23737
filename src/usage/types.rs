//! Commit type ranking.

use std::collections::HashMap;

use serde::Serialize;

use crate::usage::{ParsedCommit, BASE_WEIGHT};

/// Accumulated score of one candidate type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeScore {
    /// Candidate type name.
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Usage score.
    pub score: u64,
}

/// Scores candidate types against the log, highest first.
///
/// Only candidate types are counted; commits of other types are ignored.
/// Every candidate appears exactly once per occurrence in `types`, and ties
/// keep the order of `types`.
pub fn score_types<S: AsRef<str>>(log: &[ParsedCommit], types: &[S]) -> Vec<TypeScore> {
    let mut scores: Vec<TypeScore> = types
        .iter()
        .map(|t| TypeScore {
            commit_type: t.as_ref().to_string(),
            score: 0,
        })
        .collect();

    // Duplicated candidates accrue to their first occurrence.
    let mut slots: HashMap<&str, usize> = HashMap::with_capacity(types.len());
    for (i, t) in types.iter().enumerate() {
        slots.entry(t.as_ref()).or_insert(i);
    }

    for commit in log {
        let Some(&slot) = commit.commit_type().and_then(|t| slots.get(t)) else {
            continue;
        };
        scores[slot].score += BASE_WEIGHT + commit.relevance_weight();
    }

    // sort_by is stable
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores
}

/// Orders candidate types by how much they were used.
pub fn sort_types_by_usage<S: AsRef<str>>(log: &[ParsedCommit], types: &[S]) -> Vec<String> {
    score_types(log, types)
        .into_iter()
        .map(|s| s.commit_type)
        .collect()
}
