mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::pg_store::PgPatternStore;
use crate::matching::sources::{LlmSource, PatternSource};
use crate::matching::store::{FilePatternStore, PatternStore};
use crate::matching::{StaticFallback, SuggestionEngine};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career-api v{}", env!("CARGO_PKG_VERSION"));

    // Pattern stores, highest precedence first
    let mut pattern_stores: Vec<Arc<dyn PatternStore>> = Vec::new();

    let pg_store = match &config.database_url {
        Some(url) => {
            let store = PgPatternStore::new(create_pool(url)?);
            pattern_stores.push(Arc::new(store.clone()));
            Some(store)
        }
        None => {
            info!("DATABASE_URL not set, serving file patterns only");
            None
        }
    };

    let file_store = Arc::new(FilePatternStore::load_or_empty(&config.patterns_file).await);
    pattern_stores.push(file_store.clone());

    // Suggestion chain: stores → optional LLM → static fallback
    let mut engine = SuggestionEngine::new(StaticFallback::default());
    for store in &pattern_stores {
        engine = engine.with_source(Arc::new(PatternSource::new(
            store.clone(),
            config.match_policy,
        )));
    }

    if let Some(api_key) = config.llm_api_key() {
        let llm = LlmClient::new(api_key.to_string())?;
        engine = engine.with_source(Arc::new(LlmSource::new(llm)));
        info!("LLM suggestions enabled (model: {})", llm_client::MODEL);
    } else if config.enable_llm_suggestions {
        warn!("ENABLE_LLM_SUGGESTIONS is set but ANTHROPIC_API_KEY is missing; LLM source disabled");
    }

    info!(
        "Suggestion chain: {:?} → fallback ({} policy)",
        engine.source_names(),
        config.match_policy
    );

    let state = AppState {
        engine: Arc::new(engine),
        pattern_stores,
        file_store,
        pg_store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the quiz frontend once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
