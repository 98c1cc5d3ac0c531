//! Suggestion sources — the links of the engine's fallback chain.
//!
//! Every source answers `Some(non-empty list)` or `None`. Failures inside a
//! source are logged and reported as `None` so the chain moves on.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::llm_client::LlmClient;
use crate::matching::prompts::{SUGGESTION_PROMPT_TEMPLATE, SUGGESTION_SYSTEM};
use crate::matching::selector::{MatchPolicy, MAX_SUGGESTIONS};
use crate::matching::store::PatternStore;
use crate::models::{AnswerSet, QuizType, Suggestion};

#[async_trait]
pub trait SuggestionSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn try_get_suggestions(
        &self,
        answers: &AnswerSet,
        quiz_type: QuizType,
    ) -> Option<Vec<Suggestion>>;
}

// ────────────────────────────────────────────────────────────────────────────
// PatternSource
// ────────────────────────────────────────────────────────────────────────────

/// Runs a selection policy over the patterns of one store.
pub struct PatternSource {
    store: Arc<dyn PatternStore>,
    policy: MatchPolicy,
}

impl PatternSource {
    pub fn new(store: Arc<dyn PatternStore>, policy: MatchPolicy) -> Self {
        Self { store, policy }
    }
}

#[async_trait]
impl SuggestionSource for PatternSource {
    fn name(&self) -> &'static str {
        self.store.name()
    }

    async fn try_get_suggestions(
        &self,
        answers: &AnswerSet,
        quiz_type: QuizType,
    ) -> Option<Vec<Suggestion>> {
        let patterns = match self.store.get_patterns(quiz_type).await {
            Ok(patterns) => patterns,
            Err(e) => {
                // Unreachable store counts as "no patterns", never as a request failure
                warn!("Pattern store '{}' unavailable: {e}", self.store.name());
                return None;
            }
        };

        let selected = self.policy.select(answers, &patterns);
        debug!(
            "Store '{}' ({} {quiz_type} patterns, {} policy): {}",
            self.store.name(),
            patterns.len(),
            self.policy,
            if selected.is_some() { "matched" } else { "no match" }
        );
        selected
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSource
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LlmSuggestions {
    suggestions: Vec<Suggestion>,
}

/// Asks the model for suggestions when no local pattern matched.
pub struct LlmSource {
    llm: LlmClient,
}

impl LlmSource {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SuggestionSource for LlmSource {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn try_get_suggestions(
        &self,
        answers: &AnswerSet,
        quiz_type: QuizType,
    ) -> Option<Vec<Suggestion>> {
        let prompt = build_suggestion_prompt(answers, quiz_type);

        match self
            .llm
            .call_json::<LlmSuggestions>(&prompt, SUGGESTION_SYSTEM)
            .await
        {
            Ok(parsed) => {
                let suggestions: Vec<Suggestion> = parsed
                    .suggestions
                    .into_iter()
                    .filter(|s| !s.career.trim().is_empty())
                    .take(MAX_SUGGESTIONS)
                    .map(Suggestion::normalized)
                    .collect();
                if suggestions.is_empty() {
                    None
                } else {
                    Some(suggestions)
                }
            }
            Err(e) => {
                warn!("LLM suggestion call failed: {e}");
                None
            }
        }
    }
}

/// Renders answers in a stable (sorted) order so identical quizzes produce identical prompts.
fn build_suggestion_prompt(answers: &AnswerSet, quiz_type: QuizType) -> String {
    let mut pairs: Vec<(&String, &String)> = answers.iter().collect();
    pairs.sort();
    let rendered = pairs
        .into_iter()
        .map(|(question, answer)| format!("- {question}: {answer}"))
        .collect::<Vec<_>>()
        .join("\n");

    SUGGESTION_PROMPT_TEMPLATE
        .replace("{quiz_type}", quiz_type.as_str())
        .replace("{count}", &MAX_SUGGESTIONS.to_string())
        .replace("{answers}", &rendered)
}
