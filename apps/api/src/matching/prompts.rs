/// System prompt for LLM career suggestions.
pub const SUGGESTION_SYSTEM: &str = r#"You are a career guidance counsellor.
You receive the answers a person gave to a career interest quiz and suggest careers that fit them.
Respond ONLY with valid JSON. No markdown, no explanation outside the JSON."#;

/// Template for LLM career suggestions.
/// Placeholders: {quiz_type}, {count}, {answers}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"The person completed the {quiz_type} career quiz.

Their answers (question key: selected option):
{answers}

Suggest exactly {count} distinct careers. Return JSON with this exact shape:
{
  "suggestions": [
    {
      "career": "career name",
      "description": "one or two sentences describing the career",
      "reasoning": "why it fits these answers, referring to specific answers",
      "roadmapPath": "career-name-in-kebab-case"
    }
  ]
}"#;
