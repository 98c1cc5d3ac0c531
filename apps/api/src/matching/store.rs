//! Pattern Store — read-only access to quiz patterns.
//!
//! `PatternStore` is the seam the engine reads through. Backends:
//! - `InMemoryPatternStore`: a fixed snapshot.
//! - `FilePatternStore`: JSON file loaded into a snapshot, swappable via `reload()`.
//! - `PgPatternStore` (see `pg_store`): the `quiz_patterns` table.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{Pattern, QuizType};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid pattern row '{id}': {message}")]
    InvalidRow { id: String, message: String },

    #[error("Pattern store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Short backend label, used in logs and suggestion outcomes.
    fn name(&self) -> &'static str;

    async fn get_patterns(&self, quiz_type: QuizType) -> Result<Vec<Pattern>, StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryPatternStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct InMemoryPatternStore {
    patterns: Vec<Pattern>,
}

impl InMemoryPatternStore {
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self {
            patterns: prepare_patterns(patterns),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns_for(&self, quiz_type: QuizType) -> Vec<Pattern> {
        self.patterns
            .iter()
            .filter(|p| p.quiz_type == quiz_type)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_patterns(&self, quiz_type: QuizType) -> Result<Vec<Pattern>, StoreError> {
        Ok(self.patterns_for(quiz_type))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FilePatternStore
// ────────────────────────────────────────────────────────────────────────────

/// Summary of the snapshot currently served by a `FilePatternStore`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    pub pattern_count: usize,
    pub loaded_at: DateTime<Utc>,
}

struct Snapshot {
    store: InMemoryPatternStore,
    loaded_at: DateTime<Utc>,
}

/// Patterns loaded from a JSON array on disk.
///
/// The file is read once at construction; `reload()` re-reads it and swaps the
/// snapshot only if the top-level array parses. Malformed entries are skipped.
pub struct FilePatternStore {
    path: PathBuf,
    snapshot: RwLock<Snapshot>,
}

impl FilePatternStore {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let store = read_pattern_file(&path).await?;
        info!(
            "Loaded {} quiz patterns from {}",
            store.len(),
            path.display()
        );
        Ok(Self {
            path,
            snapshot: RwLock::new(Snapshot {
                store,
                loaded_at: Utc::now(),
            }),
        })
    }

    /// Like `load`, but starts with an empty snapshot when the file cannot be
    /// read, so the service still runs on the static fallback and a later
    /// `reload()` can pick the file up.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path).await {
            Ok(store) => store,
            Err(e) => {
                warn!("Starting with no file patterns: {e}");
                Self {
                    path: path.to_path_buf(),
                    snapshot: RwLock::new(Snapshot {
                        store: InMemoryPatternStore::default(),
                        loaded_at: Utc::now(),
                    }),
                }
            }
        }
    }

    pub async fn reload(&self) -> Result<SnapshotInfo, StoreError> {
        let store = read_pattern_file(&self.path).await?;
        let mut guard = self.snapshot.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Snapshot {
            store,
            loaded_at: Utc::now(),
        };
        info!(
            "Reloaded {} quiz patterns from {}",
            guard.store.len(),
            self.path.display()
        );
        Ok(SnapshotInfo {
            pattern_count: guard.store.len(),
            loaded_at: guard.loaded_at,
        })
    }

    pub fn info(&self) -> Result<SnapshotInfo, StoreError> {
        let guard = self.snapshot.read().map_err(|_| StoreError::Poisoned)?;
        Ok(SnapshotInfo {
            pattern_count: guard.store.len(),
            loaded_at: guard.loaded_at,
        })
    }
}

#[async_trait]
impl PatternStore for FilePatternStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn get_patterns(&self, quiz_type: QuizType) -> Result<Vec<Pattern>, StoreError> {
        let guard = self.snapshot.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.store.patterns_for(quiz_type))
    }
}

async fn read_pattern_file(path: &Path) -> Result<InMemoryPatternStore, StoreError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
    // Only the top-level array must parse; entries are decoded one at a time
    let entries: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    let store = InMemoryPatternStore::new(decode_entries(entries, path));
    if store.is_empty() {
        warn!("Pattern file {} contains no patterns", path.display());
    }
    Ok(store)
}

/// Decodes each file entry on its own; malformed entries are logged and skipped.
fn decode_entries(entries: Vec<serde_json::Value>, path: &Path) -> Vec<Pattern> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let id = entry
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("<no id>")
                .to_string();
            match serde_json::from_value::<Pattern>(entry) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(
                        "Skipping pattern #{index} '{id}' in {}: {e}",
                        path.display()
                    );
                    None
                }
            }
        })
        .collect()
}

/// Normalizes roadmap paths and flags patterns that can never be returned.
/// Such patterns are kept: they score 0 or yield nothing, and the rest still match.
pub fn prepare_patterns(patterns: Vec<Pattern>) -> Vec<Pattern> {
    patterns
        .into_iter()
        .map(|p| {
            if p.pattern.is_empty() {
                warn!("Pattern '{}' has no constraint keys and will never match", p.id);
            }
            if p.suggestions.is_empty() {
                warn!("Pattern '{}' has no suggestions", p.id);
            }
            p.normalized()
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
