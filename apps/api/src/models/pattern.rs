use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A user's quiz answers: question key → selected option string.
pub type AnswerSet = HashMap<String, String>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuizType {
    Standard,
    Long,
}

impl QuizType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizType::Standard => "standard",
            QuizType::Long => "long",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(QuizType::Standard),
            "long" => Ok(QuizType::Long),
            other => Err(format!("unknown quiz type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub career: String,
    pub description: String,
    pub reasoning: String,
    #[serde(default)]
    pub roadmap_path: String,
}

impl Suggestion {
    /// Normalizes `roadmap_path`, deriving it from the career name when empty.
    pub fn normalized(mut self) -> Self {
        if self.roadmap_path.trim().is_empty() {
            self.roadmap_path = normalize_roadmap_path(&self.career);
        } else {
            self.roadmap_path = normalize_roadmap_path(&self.roadmap_path);
        }
        self
    }
}

/// One quiz-answer archetype: a partial constraint over answers plus the
/// suggestions returned when it matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub quiz_type: QuizType,
    pub pattern: BTreeMap<String, String>,
    pub suggestions: Vec<Suggestion>,
}

impl Pattern {
    pub fn normalized(mut self) -> Self {
        self.suggestions = self
            .suggestions
            .into_iter()
            .map(Suggestion::normalized)
            .collect();
        self
    }
}

/// Row shape of the `quiz_patterns` table.
///
/// JSONB columns stay untyped so one malformed row can be rejected on its own
/// instead of failing the whole fetch.
#[derive(Debug, Clone, FromRow)]
pub struct PatternRow {
    pub id: String,
    pub quiz_type: String,
    pub pattern: Json<serde_json::Value>,
    pub suggestions: Json<serde_json::Value>,
}

impl TryFrom<PatternRow> for Pattern {
    type Error = String;

    fn try_from(row: PatternRow) -> Result<Self, Self::Error> {
        let quiz_type = row.quiz_type.parse()?;
        let pattern = serde_json::from_value(row.pattern.0)
            .map_err(|e| format!("invalid pattern column: {e}"))?;
        let suggestions = serde_json::from_value(row.suggestions.0)
            .map_err(|e| format!("invalid suggestions column: {e}"))?;

        Ok(Pattern {
            id: row.id,
            quiz_type,
            pattern,
            suggestions,
        })
    }
}

/// Lowercases a career or path name and joins its alphanumeric words with `-`.
///
/// `"Data Scientist"` → `"data-scientist"`, `"UX/UI Designer"` → `"ux-ui-designer"`.
pub fn normalize_roadmap_path(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
