//! Suggestion Engine — walks the source chain, then the static fallback.
//!
//! Production chain: database patterns → file patterns → LLM (optional) → static list.
//! The engine never fails: if no source answers, the fallback list is returned.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::matching::fallback::StaticFallback;
use crate::matching::selector::MAX_SUGGESTIONS;
use crate::matching::sources::SuggestionSource;
use crate::models::{AnswerSet, QuizType, Suggestion};

/// Source label reported when the static list was used.
pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<Suggestion>,
    pub source: String,
}

pub struct SuggestionEngine {
    sources: Vec<Arc<dyn SuggestionSource>>,
    fallback: StaticFallback,
}

impl SuggestionEngine {
    pub fn new(fallback: StaticFallback) -> Self {
        Self {
            sources: Vec::new(),
            fallback,
        }
    }

    /// Appends a source; sources are consulted in insertion order.
    pub fn with_source(mut self, source: Arc<dyn SuggestionSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn suggest(&self, answers: &AnswerSet, quiz_type: QuizType) -> SuggestionOutcome {
        for source in &self.sources {
            if let Some(mut suggestions) = source.try_get_suggestions(answers, quiz_type).await {
                if suggestions.is_empty() {
                    continue;
                }
                suggestions.truncate(MAX_SUGGESTIONS);
                info!(
                    "Suggestions for {quiz_type} quiz served by '{}' ({} results)",
                    source.name(),
                    suggestions.len()
                );
                return SuggestionOutcome {
                    suggestions,
                    source: source.name().to_string(),
                };
            }
        }

        info!("No source matched {quiz_type} quiz answers, using static fallback");
        let mut suggestions = self.fallback.suggestions(quiz_type);
        suggestions.truncate(MAX_SUGGESTIONS);
        SuggestionOutcome {
            suggestions,
            source: FALLBACK_SOURCE.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
