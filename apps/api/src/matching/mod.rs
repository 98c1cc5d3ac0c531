// Quiz matching: maps quiz answers to pre-computed career suggestions.
// Store → similarity → selector → engine chain; the engine always returns a list.

pub mod engine;
pub mod fallback;
pub mod handlers;
pub mod pg_store;
pub mod prompts;
pub mod selector;
pub mod similarity;
pub mod sources;
pub mod store;

pub use engine::{SuggestionEngine, SuggestionOutcome};
pub use fallback::StaticFallback;
pub use selector::MatchPolicy;
