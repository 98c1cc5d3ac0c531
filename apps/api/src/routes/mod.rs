pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/suggestions", post(handlers::handle_suggest))
        .route(
            "/api/v1/patterns",
            get(handlers::handle_list_patterns).put(handlers::handle_upsert_patterns),
        )
        .route(
            "/api/v1/patterns/reload",
            post(handlers::handle_reload_patterns),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::matching::sources::PatternSource;
    use crate::matching::store::{FilePatternStore, PatternStore};
    use crate::matching::{MatchPolicy, StaticFallback, SuggestionEngine};

    async fn test_state(file: &tempfile::NamedTempFile) -> AppState {
        let file_store = Arc::new(FilePatternStore::load(file.path()).await.unwrap());
        let pattern_stores: Vec<Arc<dyn PatternStore>> = vec![file_store.clone()];
        let engine = SuggestionEngine::new(StaticFallback::default()).with_source(Arc::new(
            PatternSource::new(file_store.clone(), MatchPolicy::Partial),
        ));

        AppState {
            engine: Arc::new(engine),
            pattern_stores,
            file_store,
            pg_store: None,
            config: Config {
                database_url: None,
                patterns_file: PathBuf::from(file.path()),
                match_policy: MatchPolicy::Partial,
                enable_llm_suggestions: false,
                anthropic_api_key: None,
                port: 8080,
                rust_log: "info".to_string(),
            },
        }
    }

    fn pattern_file() -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        let patterns = json!([{
            "id": "puzzles",
            "quizType": "standard",
            "pattern": {"activity": "Solving complex puzzles or math problems."},
            "suggestions": [{
                "career": "Data Scientist",
                "description": "Finds insight in data.",
                "reasoning": "Enjoys puzzles and maths."
            }]
        }]);
        std::fs::write(file.path(), patterns.to_string()).unwrap();
        file
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_suggest_matches_file_pattern() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let (status, body) = send(
            app,
            post_json(
                "/api/v1/suggestions",
                json!({
                    "quizType": "standard",
                    "answers": {
                        "activity": "Solving complex puzzles or math problems.",
                        "role": "The leader..."
                    }
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "file");
        assert_eq!(body["suggestions"][0]["career"], "Data Scientist");
        assert_eq!(body["suggestions"][0]["roadmapPath"], "data-scientist");
    }

    #[tokio::test]
    async fn test_suggest_falls_back_when_nothing_matches() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let (status, body) = send(
            app,
            post_json(
                "/api/v1/suggestions",
                json!({"quizType": "long", "answers": {"activity": "Gardening"}}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "fallback");
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_suggest_rejects_empty_answers() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let (status, body) = send(
            app,
            post_json("/api/v1/suggestions", json!({"answers": {}})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_patterns_from_file() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let request = Request::builder()
            .uri("/api/v1/patterns?quiz_type=standard")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "file");
        assert_eq!(body["patterns"][0]["id"], "puzzles");
    }

    #[tokio::test]
    async fn test_upsert_without_database_is_not_configured() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/patterns")
            .header("content-type", "application/json")
            .body(Body::from("[]"))
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_reload_reports_pattern_count() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/patterns/reload")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patternCount"], 1);
    }

    #[tokio::test]
    async fn test_health_reports_chain() {
        let file = pattern_file();
        let app = build_router(test_state(&file).await);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchPolicy"], "partial");
        assert_eq!(body["sources"], json!(["file"]));
    }
}
