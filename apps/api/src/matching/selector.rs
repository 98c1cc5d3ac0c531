//! Selector — turns per-pattern similarity scores into a suggestion list.
//!
//! Two policies:
//! - `Strict`: single best pattern, accepted at ≥ 60% similarity.
//! - `Partial` (default): every pattern at ≥ 40% is a candidate; patterns within
//!   0.1 of the best score are merged, deduplicated by career name, capped at 3.
//!
//! A selector returning `None` means "no pattern matched"; the engine decides
//! what to fall back to.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::matching::similarity::compute_similarity;
use crate::models::{AnswerSet, Pattern, Suggestion};

/// Minimum similarity for the strict single-best policy.
pub const STRICT_THRESHOLD: f64 = 0.6;
/// Minimum similarity for a pattern to be a partial-matching candidate.
pub const PARTIAL_THRESHOLD: f64 = 0.4;
/// Patterns within this distance of the best score are merged.
pub const NEAR_TIE_MARGIN: f64 = 0.1;
/// Upper bound on merged suggestions.
pub const MAX_SUGGESTIONS: usize = 3;

/// Absorbs rounding in `best - score` comparisons (0.8 - 0.1 != 0.7 in f64).
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    Strict,
    #[default]
    Partial,
}

impl MatchPolicy {
    pub fn select(&self, answers: &AnswerSet, patterns: &[Pattern]) -> Option<Vec<Suggestion>> {
        match self {
            MatchPolicy::Strict => select_best_match(answers, patterns),
            MatchPolicy::Partial => select_partial_match(answers, patterns),
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Strict => f.write_str("strict"),
            MatchPolicy::Partial => f.write_str("partial"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(MatchPolicy::Strict),
            "partial" => Ok(MatchPolicy::Partial),
            other => Err(format!(
                "unknown match policy '{other}' (expected 'strict' or 'partial')"
            )),
        }
    }
}

/// A pattern paired with its similarity to one answer set.
#[derive(Debug, Clone)]
pub struct ScoredPattern<'a> {
    pub pattern: &'a Pattern,
    pub score: f64,
}

/// Scores every pattern, preserving collection order.
pub fn score_patterns<'a>(answers: &AnswerSet, patterns: &'a [Pattern]) -> Vec<ScoredPattern<'a>> {
    patterns
        .iter()
        .map(|pattern| ScoredPattern {
            pattern,
            score: compute_similarity(answers, &pattern.pattern),
        })
        .collect()
}

/// Policy A: the single highest-scoring pattern, if it reaches `STRICT_THRESHOLD`.
/// On exact ties the earliest pattern in collection order wins.
pub fn select_best_match(answers: &AnswerSet, patterns: &[Pattern]) -> Option<Vec<Suggestion>> {
    let mut best: Option<ScoredPattern<'_>> = None;
    for scored in score_patterns(answers, patterns) {
        let better = best.as_ref().map_or(true, |b| scored.score > b.score);
        if better {
            best = Some(scored);
        }
    }

    let best = best?;
    if best.score + SCORE_EPSILON < STRICT_THRESHOLD {
        return None;
    }

    non_empty(best.pattern.suggestions.clone())
}

/// Policy B: merge near-tied candidates above `PARTIAL_THRESHOLD`.
pub fn select_partial_match(answers: &AnswerSet, patterns: &[Pattern]) -> Option<Vec<Suggestion>> {
    let mut candidates: Vec<ScoredPattern<'_>> = score_patterns(answers, patterns)
        .into_iter()
        .filter(|s| s.score + SCORE_EPSILON >= PARTIAL_THRESHOLD)
        .collect();

    if candidates.is_empty() {
        return None;
    }

    // Stable sort: equal scores keep collection order.
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let best_score = candidates[0].score;
    let near_tied: Vec<&ScoredPattern<'_>> = candidates
        .iter()
        .filter(|s| best_score - s.score <= NEAR_TIE_MARGIN + SCORE_EPSILON)
        .collect();

    if let [only] = near_tied.as_slice() {
        return non_empty(only.pattern.suggestions.clone());
    }

    non_empty(merge_suggestions(near_tied.iter().map(|s| s.pattern)))
}

/// Concatenates suggestions in pattern order, keeping the first suggestion seen
/// for each career name, truncated to `MAX_SUGGESTIONS`.
fn merge_suggestions<'a>(patterns: impl Iterator<Item = &'a Pattern>) -> Vec<Suggestion> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::new();

    for pattern in patterns {
        for suggestion in &pattern.suggestions {
            if merged.len() == MAX_SUGGESTIONS {
                return merged;
            }
            if seen.insert(suggestion.career.as_str()) {
                merged.push(suggestion.clone());
            }
        }
    }

    merged
}

fn non_empty(suggestions: Vec<Suggestion>) -> Option<Vec<Suggestion>> {
    if suggestions.is_empty() {
        None
    } else {
        Some(suggestions)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
