//! Axum route handlers for the Suggestions and Patterns API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::matching::store::SnapshotInfo;
use crate::matching::SuggestionOutcome;
use crate::models::{AnswerSet, Pattern, QuizType};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub answers: AnswerSet,
    #[serde(default = "default_quiz_type")]
    pub quiz_type: QuizType,
}

fn default_quiz_type() -> QuizType {
    QuizType::Standard
}

#[derive(Debug, Deserialize)]
pub struct QuizTypeQuery {
    pub quiz_type: Option<QuizType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternListResponse {
    pub source: String,
    pub quiz_type: QuizType,
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPatternsResponse {
    pub written: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/suggestions
///
/// Always answers with a list; store failures degrade to the next source.
pub async fn handle_suggest(
    State(state): State<AppState>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<SuggestionOutcome>, AppError> {
    if request.answers.is_empty() {
        return Err(AppError::Validation("answers cannot be empty".to_string()));
    }

    let outcome = state
        .engine
        .suggest(&request.answers, request.quiz_type)
        .await;
    Ok(Json(outcome))
}

/// GET /api/v1/patterns?quiz_type=standard
///
/// Lists patterns from the highest-precedence store that can be read.
pub async fn handle_list_patterns(
    State(state): State<AppState>,
    Query(params): Query<QuizTypeQuery>,
) -> Result<Json<PatternListResponse>, AppError> {
    let quiz_type = params.quiz_type.unwrap_or(QuizType::Standard);
    let mut last_error = None;

    for store in &state.pattern_stores {
        match store.get_patterns(quiz_type).await {
            Ok(patterns) => {
                return Ok(Json(PatternListResponse {
                    source: store.name().to_string(),
                    quiz_type,
                    patterns,
                }))
            }
            Err(e) => {
                warn!("Could not list patterns from '{}': {e}", store.name());
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(AppError::Store(e)),
        None => Err(AppError::NotConfigured(
            "No pattern store is configured".to_string(),
        )),
    }
}

/// POST /api/v1/patterns/reload
///
/// Re-reads the pattern file. A failed reload keeps serving the previous snapshot.
pub async fn handle_reload_patterns(
    State(state): State<AppState>,
) -> Result<Json<SnapshotInfo>, AppError> {
    let info = state.file_store.reload().await?;
    Ok(Json(info))
}

/// PUT /api/v1/patterns
///
/// Administrative regeneration: upserts patterns into the database store.
pub async fn handle_upsert_patterns(
    State(state): State<AppState>,
    Json(patterns): Json<Vec<Pattern>>,
) -> Result<Json<UpsertPatternsResponse>, AppError> {
    let store = state.pg_store.as_ref().ok_or_else(|| {
        AppError::NotConfigured("DATABASE_URL is not set; patterns are file-backed".to_string())
    })?;

    if let Some(p) = patterns.iter().find(|p| p.id.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "pattern id cannot be empty (quiz type {})",
            p.quiz_type
        )));
    }

    let written = store.upsert_patterns(patterns).await?;
    Ok(Json(UpsertPatternsResponse { written }))
}
