//! Scope aggregation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::usage::{ParsedCommit, BASE_WEIGHT, TYPE_AFFINITY_BONUS};

/// How often a scope was used and with which types.
///
/// Serialized with the field names earlier tooling consumed
/// (`occurence`, `withTypes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFrequency {
    /// Scope name.
    pub name: String,
    /// Number of commits carrying the scope.
    #[serde(rename = "occurence")]
    pub occurrence: u64,
    /// Distinct types seen with the scope, in first-seen order.
    #[serde(rename = "withTypes")]
    pub with_types: Vec<String>,
}

/// Weighted score of one scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeScore {
    /// Scope name.
    pub name: String,
    /// Usage score.
    pub score: u64,
}

/// Folds commits that carry a scope into one record per scope.
///
/// Records come out in the order their scope was first seen.
fn fold_by_scope<R>(
    log: &[ParsedCommit],
    mut create: impl FnMut(&str) -> R,
    mut update: impl FnMut(&mut R, &ParsedCommit),
) -> Vec<R> {
    let mut records: Vec<R> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for commit in log {
        let Some(scope) = commit.scope() else {
            continue;
        };

        let slot = *slots.entry(scope).or_insert_with(|| {
            records.push(create(scope));
            records.len() - 1
        });
        update(&mut records[slot], commit);
    }

    records
}

/// Counts scope usage, most used first.
///
/// Ties keep first-seen order. Only recognized commits are counted, so a
/// type-less header such as `(ui): tweak` contributes no scope. Older
/// tooling reported such scopes with a null entry in `withTypes`.
pub fn simple_scope_frequency(log: &[ParsedCommit]) -> Vec<ScopeFrequency> {
    let mut records = fold_by_scope(
        log,
        |name| ScopeFrequency {
            name: name.to_string(),
            occurrence: 0,
            with_types: Vec::new(),
        },
        |record, commit| {
            record.occurrence += 1;
            if let Some(commit_type) = commit.commit_type() {
                if !record.with_types.iter().any(|t| t == commit_type) {
                    record.with_types.push(commit_type.to_string());
                }
            }
        },
    );

    records.sort_by(|a, b| b.occurrence.cmp(&a.occurrence));
    records
}

/// Scores scopes for a commit of type `commit_type`, highest first.
///
/// Each commit with a scope adds the base weight, the type-affinity bonus
/// when its type matches, and the relevance bonus when it touched a staged
/// file. Ties keep first-seen order.
pub fn score_scopes_for_type(log: &[ParsedCommit], commit_type: &str) -> Vec<ScopeScore> {
    let mut records = fold_by_scope(
        log,
        |name| ScopeScore {
            name: name.to_string(),
            score: 0,
        },
        |record, commit| {
            record.score += BASE_WEIGHT + commit.relevance_weight();
            if commit.commit_type() == Some(commit_type) {
                record.score += TYPE_AFFINITY_BONUS;
            }
        },
    );

    records.sort_by(|a, b| b.score.cmp(&a.score));
    records
}

/// Orders scopes by their score for `commit_type`.
pub fn sorted_scopes_for_type(log: &[ParsedCommit], commit_type: &str) -> Vec<String> {
    score_scopes_for_type(log, commit_type)
        .into_iter()
        .map(|s| s.name)
        .collect()
}
