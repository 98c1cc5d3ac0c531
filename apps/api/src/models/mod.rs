pub mod pattern;

pub use pattern::{normalize_roadmap_path, AnswerSet, Pattern, PatternRow, QuizType, Suggestion};
