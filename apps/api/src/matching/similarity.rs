use std::collections::BTreeMap;

use crate::models::AnswerSet;

/// Fraction of the pattern's constrained keys whose expected value equals the
/// user's answer (exact, case-sensitive). Keys outside the pattern are ignored.
///
/// An empty constraint map scores 0.0 and therefore never matches.
pub fn compute_similarity(answers: &AnswerSet, pattern: &BTreeMap<String, String>) -> f64 {
    if pattern.is_empty() {
        return 0.0;
    }

    let matched = pattern
        .iter()
        .filter(|(key, expected)| answers.get(*key) == Some(*expected))
        .count();

    matched as f64 / pattern.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn constraints(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_pattern_scores_zero() {
        let a = answers(&[("activity", "Drawing")]);
        assert_eq!(compute_similarity(&a, &BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_full_match_is_one() {
        let a = answers(&[
            ("activity", "Solving complex puzzles or math problems."),
            ("role", "The leader..."),
        ]);
        let p = constraints(&[("activity", "Solving complex puzzles or math problems.")]);
        assert_eq!(compute_similarity(&a, &p), 1.0);
    }

    #[test]
    fn test_missing_answer_counts_as_miss() {
        let a = answers(&[("activity", "Drawing")]);
        let p = constraints(&[("activity", "Drawing"), ("role", "Leader")]);
        assert_eq!(compute_similarity(&a, &p), 0.5);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let a = answers(&[("activity", "drawing")]);
        let p = constraints(&[("activity", "Drawing")]);
        assert_eq!(compute_similarity(&a, &p), 0.0);
    }

    #[test]
    fn test_extra_answers_do_not_change_score() {
        let p = constraints(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let narrow = answers(&[("a", "1"), ("b", "x")]);
        let wide = answers(&[("a", "1"), ("b", "x"), ("d", "4"), ("e", "5")]);
        assert_eq!(compute_similarity(&narrow, &p), compute_similarity(&wide, &p));
        assert!((compute_similarity(&narrow, &p) - 1.0 / 3.0).abs() < f64::EPSILON);
    }
}
