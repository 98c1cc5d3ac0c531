use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::matching::store::{prepare_patterns, PatternStore, StoreError};
use crate::models::{Pattern, PatternRow, QuizType};

/// PostgreSQL-backed pattern store over the `quiz_patterns` table.
///
/// When configured, it takes precedence over the file store entirely; the two
/// pattern sets are never merged.
#[derive(Clone)]
pub struct PgPatternStore {
    pool: PgPool,
}

impl PgPatternStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces patterns by id. Used by administrative regeneration only.
    pub async fn upsert_patterns(&self, patterns: Vec<Pattern>) -> Result<u64, StoreError> {
        let patterns = prepare_patterns(patterns);
        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;

        for pattern in &patterns {
            let result = sqlx::query(
                r#"
                INSERT INTO quiz_patterns (id, quiz_type, pattern, suggestions)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE
                SET quiz_type = EXCLUDED.quiz_type,
                    pattern = EXCLUDED.pattern,
                    suggestions = EXCLUDED.suggestions,
                    updated_at = NOW()
                "#,
            )
            .bind(&pattern.id)
            .bind(pattern.quiz_type.as_str())
            .bind(Json(&pattern.pattern))
            .bind(Json(&pattern.suggestions))
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        info!("Upserted {written} quiz patterns");
        Ok(written)
    }
}

#[async_trait]
impl PatternStore for PgPatternStore {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn get_patterns(&self, quiz_type: QuizType) -> Result<Vec<Pattern>, StoreError> {
        // Insertion order is the tie-break order for equal scores.
        let rows = sqlx::query_as::<_, PatternRow>(
            r#"
            SELECT id, quiz_type, pattern, suggestions
            FROM quiz_patterns
            WHERE quiz_type = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(quiz_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} {quiz_type} patterns from database", rows.len());

        Ok(decode_rows(rows))
    }
}

/// Converts rows one by one; a malformed row is logged and skipped so the
/// remaining patterns are still served.
fn decode_rows(rows: Vec<PatternRow>) -> Vec<Pattern> {
    let patterns = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match Pattern::try_from(row) {
                Ok(pattern) => Some(pattern),
                Err(message) => {
                    warn!("Skipping {}", StoreError::InvalidRow { id, message });
                    None
                }
            }
        })
        .collect();

    prepare_patterns(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, quiz_type: &str, pattern: serde_json::Value, suggestions: serde_json::Value) -> PatternRow {
        PatternRow {
            id: id.to_string(),
            quiz_type: quiz_type.to_string(),
            pattern: Json(pattern),
            suggestions: Json(suggestions),
        }
    }

    fn chef() -> serde_json::Value {
        json!([{"career": "Head Chef", "description": "d", "reasoning": "r"}])
    }

    #[test]
    fn test_decode_rows_normalizes_roadmap_paths() {
        let patterns = decode_rows(vec![row("p1", "standard", json!({"a": "1"}), chef())]);
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].suggestions[0].roadmap_path, "head-chef");
    }

    #[test]
    fn test_decode_rows_skips_malformed_rows() {
        let patterns = decode_rows(vec![
            row("bad-type", "quick", json!({"a": "1"}), chef()),
            row("good", "standard", json!({"a": "1"}), chef()),
            row("bad-answer", "standard", json!({"a": 2}), chef()),
            row("bad-suggestion", "standard", json!({"a": "1"}), json!([{"career": "Chef"}])),
        ]);

        let ids: Vec<_> = patterns.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["good"]);
    }

    #[test]
    fn test_decode_rows_keeps_row_order() {
        let patterns = decode_rows(vec![
            row("first", "long", json!({"a": "1"}), chef()),
            row("second", "long", json!({"b": "2"}), chef()),
        ]);
        let ids: Vec<_> = patterns.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
