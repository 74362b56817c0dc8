// All LLM prompt templates for the interview module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Question generation prompt template.
/// Replace: {persona}, {difficulty}, {performance_context}, {ordinal}, {total},
///          {starter}, {examples}, {previous_questions}, {focus}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"{persona} Generate a {difficulty} level Excel question.

{performance_context}Question #{ordinal} of {total}.

Start with: "{starter}"

Example {difficulty} questions:
{examples}
{previous_questions}

IMPORTANT: Generate a NEW question that is DIFFERENT from any previous questions. Avoid repeating topics or scenarios.

Generate a conversational, scenario-based Excel question that tests {difficulty} skills.
Make it sound like you're asking a colleague about a real work situation.
Focus on: {focus}.

Return only the question text in a friendly, conversational tone."#;

/// Answer evaluation prompt template.
/// Replace: {persona}, {question}, {expected_answer}, {criteria}, {answer}, {json_only}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"{persona} Score the candidate's answer to the question below.

QUESTION:
{question}

REFERENCE ANSWER (guidance only, other correct approaches are fine):
{expected_answer}

RUBRIC:
{criteria}

CANDIDATE ANSWER:
{answer}

Score each dimension from 0 to 10. Honest uncertainty or an empty answer scores near 0.
Return a JSON object with this EXACT schema:
{
  "technical_score": 7.5,
  "efficiency_score": 8.0,
  "practices_score": 7.0,
  "communication_score": 8.5,
  "feedback": "One or two friendly sentences for the candidate."
}

{json_only}"#;

/// Opening lines offered to the generator, per tier.
pub const BEGINNER_STARTERS: [&str; 3] = [
    "Let's start with something practical...",
    "Here's a common scenario...",
    "Imagine you're helping a colleague with...",
];

pub const INTERMEDIATE_STARTERS: [&str; 3] = [
    "Now let's get a bit more interesting...",
    "Here's a situation that comes up often...",
    "Let's say you need to...",
];

pub const ADVANCED_STARTERS: [&str; 3] = [
    "Time for a challenge...",
    "Here's something that might test your expertise...",
    "Let's dive into something more complex...",
];
