use std::sync::Arc;

use crate::config::Config;
use crate::matching::pg_store::PgPatternStore;
use crate::matching::store::{FilePatternStore, PatternStore};
use crate::matching::SuggestionEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SuggestionEngine>,
    /// Pattern stores in precedence order (database first when configured).
    pub pattern_stores: Vec<Arc<dyn PatternStore>>,
    /// File store handle for admin reloads.
    pub file_store: Arc<FilePatternStore>,
    /// Present only when `DATABASE_URL` is set.
    pub pg_store: Option<PgPatternStore>,
    pub config: Config,
}
