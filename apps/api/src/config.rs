use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::matching::MatchPolicy;

/// Application configuration loaded from environment variables.
/// Every variable has a default; the service runs offline with only the pattern file.
#[derive(Debug, Clone)]
pub struct Config {
    /// When set, database patterns take precedence over the file.
    pub database_url: Option<String>,
    pub patterns_file: PathBuf,
    pub match_policy: MatchPolicy,
    pub enable_llm_suggestions: bool,
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            database_url: non_empty("DATABASE_URL"),
            patterns_file: non_empty("PATTERNS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/quiz_patterns.json")),
            match_policy: match non_empty("MATCH_POLICY") {
                Some(raw) => raw
                    .parse::<MatchPolicy>()
                    .map_err(anyhow::Error::msg)
                    .context("MATCH_POLICY must be 'strict' or 'partial'")?,
                None => MatchPolicy::default(),
            },
            enable_llm_suggestions: match non_empty("ENABLE_LLM_SUGGESTIONS") {
                Some(raw) => parse_bool(&raw)
                    .with_context(|| format!("ENABLE_LLM_SUGGESTIONS has invalid value '{raw}'"))?,
                None => false,
            },
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            port: non_empty("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// LLM suggestions need both the flag and a key.
    pub fn llm_api_key(&self) -> Option<&str> {
        if self.enable_llm_suggestions {
            self.anthropic_api_key.as_deref()
        } else {
            None
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("expected true/false"),
    }
}
