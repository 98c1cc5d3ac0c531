//! Static Fallback Set — the always-available last resort of the engine.

use std::collections::HashMap;

use crate::models::{normalize_roadmap_path, QuizType, Suggestion};

/// Quiz-type-keyed default suggestions, built once at startup.
#[derive(Debug, Clone)]
pub struct StaticFallback {
    lists: HashMap<QuizType, Vec<Suggestion>>,
}

impl StaticFallback {
    pub fn new(lists: HashMap<QuizType, Vec<Suggestion>>) -> Self {
        Self { lists }
    }

    /// Fallback list for a quiz type. Quiz types without an entry get an empty list.
    pub fn suggestions(&self, quiz_type: QuizType) -> Vec<Suggestion> {
        self.lists.get(&quiz_type).cloned().unwrap_or_default()
    }
}

impl Default for StaticFallback {
    fn default() -> Self {
        Self::new(HashMap::from([
            (QuizType::Standard, standard_defaults()),
            (QuizType::Long, long_defaults()),
        ]))
    }
}

fn entry(career: &str, description: &str, reasoning: &str) -> Suggestion {
    Suggestion {
        career: career.to_string(),
        description: description.to_string(),
        reasoning: reasoning.to_string(),
        roadmap_path: normalize_roadmap_path(career),
    }
}

fn standard_defaults() -> Vec<Suggestion> {
    vec![
        entry(
            "Software Developer",
            "Designs, builds and maintains applications and systems.",
            "A broad entry point that rewards problem solving and continuous learning.",
        ),
        entry(
            "Data Analyst",
            "Turns raw data into insights that guide decisions.",
            "Fits people who like patterns, numbers and clear answers.",
        ),
        entry(
            "Project Manager",
            "Plans and coordinates work so teams deliver on time.",
            "Suits organised people who enjoy working with others.",
        ),
    ]
}

fn long_defaults() -> Vec<Suggestion> {
    vec![
        entry(
            "Product Manager",
            "Decides what gets built and why, balancing users and business goals.",
            "Combines communication, analysis and leadership across many disciplines.",
        ),
        entry(
            "UX Designer",
            "Researches users and designs how products look and feel.",
            "Matches creative thinkers who care about how people experience things.",
        ),
        entry(
            "Business Analyst",
            "Bridges stakeholders and technical teams by defining requirements.",
            "Good for structured thinkers who enjoy both people and problems.",
        ),
    ]
}
