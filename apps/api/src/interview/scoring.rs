//! Scoring Engine — turns a free-text answer into four sub-scores and feedback.
//!
//! Default: lexical three-tier policy (uncertain / knowledgeable / attempted).
//! Purely keyword-based, deterministic per tier; only the feedback wording is random.
//! Optional: LLM evaluation, which always falls back to the lexical policy on failure.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

use crate::interview::models::{CandidateResponse, Question};
use crate::interview::prompts::EVALUATION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{fill_template, INTERVIEWER_PERSONA, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{generate_json, GenerationParams, LlmError, TextGenerator};

/// Answers shorter than this (trimmed, in characters) count as uncertain.
const MIN_ANSWER_CHARS: usize = 20;

const UNCERTAINTY_PHRASES: [&str; 6] = [
    "not sure",
    "don't know",
    "not certain",
    "unsure",
    "no idea",
    "can't remember",
];

const EXCEL_TERMS: [&str; 19] = [
    "formula",
    "function",
    "vlookup",
    "pivot",
    "sum",
    "average",
    "count",
    "index",
    "match",
    "if",
    "sumif",
    "countif",
    "chart",
    "graph",
    "data",
    "cell",
    "range",
    "worksheet",
    "workbook",
];

const UNCERTAIN_FEEDBACK: [&str; 3] = [
    "No worries at all! That's a complex scenario. Let's move on to the next question!",
    "That's totally understandable! These advanced topics can be tricky. Ready for the next one?",
    "No problem! It's better to be honest than to guess. Let's continue!",
];

const KNOWLEDGEABLE_FEEDBACK: [&str; 4] = [
    "Great! I can see you know your Excel functions. Nice thinking on that one!",
    "Awesome! You're definitely familiar with Excel tools. I like your approach!",
    "Perfect! You've got solid Excel knowledge there. Well done!",
    "Excellent! That's exactly the kind of Excel expertise I was hoping to hear!",
];

const ATTEMPTED_FEEDBACK: [&str; 4] = [
    "I appreciate you giving it a try! Let's explore some Excel solutions for this.",
    "Thanks for your thoughts! There are some specific Excel techniques that could help here.",
    "Good effort! This is where Excel's advanced features really shine.",
    "Nice attempt! Let me share how Excel could tackle this challenge.",
];

/// Answer recorded when the candidate's timer runs out.
pub const TIMEOUT_ANSWER: &str = "[No answer - time expired]";
pub const TIMEOUT_FEEDBACK: &str = "Time's up! Let's move on.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerClass {
    Uncertain,
    Knowledgeable,
    Attempted,
}

impl AnswerClass {
    /// Fixed sub-scores: technical, efficiency, practices, communication.
    pub fn scores(&self) -> [f64; 4] {
        match self {
            AnswerClass::Uncertain => [0.0, 0.0, 0.0, 2.0],
            AnswerClass::Knowledgeable => [7.5, 8.0, 7.0, 8.5],
            AnswerClass::Attempted => [2.0, 3.0, 2.0, 4.0],
        }
    }

    pub fn feedback_pool(&self) -> &'static [&'static str] {
        match self {
            AnswerClass::Uncertain => &UNCERTAIN_FEEDBACK,
            AnswerClass::Knowledgeable => &KNOWLEDGEABLE_FEEDBACK,
            AnswerClass::Attempted => &ATTEMPTED_FEEDBACK,
        }
    }
}

/// Lexical classification. Uncertainty wins over domain terms.
pub fn classify_answer(answer: &str) -> AnswerClass {
    let lower = answer.to_lowercase();

    let uncertain = UNCERTAINTY_PHRASES.iter().any(|p| lower.contains(p))
        || answer.trim().chars().count() < MIN_ANSWER_CHARS;
    if uncertain {
        return AnswerClass::Uncertain;
    }

    // Whole whitespace-separated tokens only: "sum," or "=SUM(A1:A10)" do not match.
    let knowledgeable = lower
        .split_whitespace()
        .any(|token| EXCEL_TERMS.contains(&token));
    if knowledgeable {
        AnswerClass::Knowledgeable
    } else {
        AnswerClass::Attempted
    }
}

pub fn pick_feedback<R: Rng + ?Sized>(class: AnswerClass, rng: &mut R) -> &'static str {
    // Pools are non-empty constants.
    class.feedback_pool().choose(rng).copied().unwrap_or_default()
}

fn response_from_scores(
    question_id: &str,
    answer: &str,
    scores: [f64; 4],
    feedback: String,
) -> CandidateResponse {
    CandidateResponse {
        question_id: question_id.to_string(),
        answer: answer.to_string(),
        technical_score: scores[0],
        efficiency_score: scores[1],
        practices_score: scores[2],
        communication_score: scores[3],
        feedback,
    }
}

/// Scores an answer with the lexical policy. Needs nothing external.
pub fn score_lexically<R: Rng + ?Sized>(
    question_id: &str,
    answer: &str,
    rng: &mut R,
) -> CandidateResponse {
    let class = classify_answer(answer);
    let feedback = pick_feedback(class, rng).to_string();
    response_from_scores(question_id, answer, class.scores(), feedback)
}

/// Zero-score response recorded when the timer expires.
pub fn timed_out_response(question_id: &str) -> CandidateResponse {
    response_from_scores(
        question_id,
        TIMEOUT_ANSWER,
        [0.0; 4],
        TIMEOUT_FEEDBACK.to_string(),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// LLM evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Raw evaluation returned by the generation service.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmEvaluation {
    pub technical_score: f64,
    pub efficiency_score: f64,
    pub practices_score: f64,
    pub communication_score: f64,
    #[serde(default)]
    pub feedback: String,
}

impl LlmEvaluation {
    fn clamped_scores(&self) -> [f64; 4] {
        [
            self.technical_score,
            self.efficiency_score,
            self.practices_score,
            self.communication_score,
        ]
        .map(|s| if s.is_finite() { s.clamp(0.0, 10.0) } else { 0.0 })
    }
}

fn build_evaluation_prompt(question: &Question, answer: &str) -> String {
    let criteria = question
        .scoring_criteria
        .iter()
        .map(|(dimension, rubric)| format!("- {dimension}: {rubric}"))
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        EVALUATION_PROMPT_TEMPLATE,
        &[
            ("persona", INTERVIEWER_PERSONA),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("question", &question.question),
            ("expected_answer", &question.expected_answer),
            ("criteria", &criteria),
            ("answer", answer),
        ],
    )
}

/// Asks the generation service to score the answer. Errors are left to the caller.
pub async fn evaluate_with_llm(
    generator: &dyn TextGenerator,
    question: &Question,
    answer: &str,
) -> Result<LlmEvaluation, LlmError> {
    let prompt = build_evaluation_prompt(question, answer);
    generate_json(generator, &prompt, &GenerationParams::EVALUATION).await
}

/// Converts an LLM evaluation into a response; blank feedback is filled from
/// the pool the lexical policy would have used.
pub fn response_from_llm<R: Rng + ?Sized>(
    question_id: &str,
    answer: &str,
    evaluation: LlmEvaluation,
    rng: &mut R,
) -> CandidateResponse {
    let feedback = match evaluation.feedback.trim() {
        "" => pick_feedback(classify_answer(answer), rng).to_string(),
        text => text.to_string(),
    };
    response_from_scores(question_id, answer, evaluation.clamped_scores(), feedback)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::catalog::question_by_id;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_short_answer_is_uncertain_even_with_terms() {
        assert_eq!(classify_answer("use vlookup"), AnswerClass::Uncertain);
        assert_eq!(classify_answer("   sum   "), AnswerClass::Uncertain);
    }

    #[test]
    fn test_uncertainty_phrase_beats_domain_terms() {
        let answer = "I'm not sure, maybe a pivot table with a sum formula would work";
        assert_eq!(classify_answer(answer), AnswerClass::Uncertain);
    }

    #[test]
    fn test_uncertainty_phrase_is_case_insensitive() {
        let answer = "Honestly I have NO IDEA how the workbook should be structured";
        assert_eq!(classify_answer(answer), AnswerClass::Uncertain);
    }

    #[test]
    fn test_domain_term_makes_answer_knowledgeable() {
        let answer = "I would build a Pivot table and drag the region into columns";
        assert_eq!(classify_answer(answer), AnswerClass::Knowledgeable);
    }

    #[test]
    fn test_terms_must_be_whole_tokens() {
        // "summary" and "=SUM(A1:A10)" are not whole-token matches for "sum".
        let answer = "Type =SUM(A1:A10) and read the summary at the bottom";
        assert_eq!(classify_answer(answer), AnswerClass::Attempted);
    }

    #[test]
    fn test_long_answer_without_terms_is_attempted() {
        let answer = "I would ask a colleague who knows spreadsheets better than me";
        assert_eq!(classify_answer(answer), AnswerClass::Attempted);
    }

    #[test]
    fn test_twenty_characters_is_not_short() {
        let answer = "abcdefghijklmnopqrst"; // exactly 20 chars, no terms
        assert_eq!(answer.len(), 20);
        assert_eq!(classify_answer(answer), AnswerClass::Attempted);
    }

    #[test]
    fn test_lexical_scores_per_tier() {
        let mut rng = rng();
        let r = score_lexically("c3", "I don't know that one at all, sorry", &mut rng);
        assert_eq!(r.scores(), [0.0, 0.0, 0.0, 2.0]);
        assert!(UNCERTAIN_FEEDBACK.contains(&r.feedback.as_str()));

        let r = score_lexically("c3", "I would use vlookup with exact match on the price list", &mut rng);
        assert_eq!(r.scores(), [7.5, 8.0, 7.0, 8.5]);
        assert!(KNOWLEDGEABLE_FEEDBACK.contains(&r.feedback.as_str()));

        let r = score_lexically("c3", "I would scroll through and find it by eye", &mut rng);
        assert_eq!(r.scores(), [2.0, 3.0, 2.0, 4.0]);
        assert!(ATTEMPTED_FEEDBACK.contains(&r.feedback.as_str()));
        assert_eq!(r.question_id, "c3");
    }

    #[test]
    fn test_feedback_is_deterministic_for_a_seed() {
        let a = pick_feedback(AnswerClass::Knowledgeable, &mut rng());
        let b = pick_feedback(AnswerClass::Knowledgeable, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn test_timed_out_response_is_zero() {
        let r = timed_out_response("w2");
        assert_eq!(r.scores(), [0.0; 4]);
        assert_eq!(r.answer, TIMEOUT_ANSWER);
        assert_eq!(r.feedback, TIMEOUT_FEEDBACK);
    }

    #[test]
    fn test_llm_scores_are_clamped() {
        let evaluation = LlmEvaluation {
            technical_score: 12.0,
            efficiency_score: -3.0,
            practices_score: 6.5,
            communication_score: f64::NAN,
            feedback: "Solid answer.".to_string(),
        };
        let r = response_from_llm("c1", "answer", evaluation, &mut rng());
        assert_eq!(r.scores(), [10.0, 0.0, 6.5, 0.0]);
        assert_eq!(r.feedback, "Solid answer.");
    }

    #[test]
    fn test_blank_llm_feedback_uses_lexical_pool() {
        let evaluation = LlmEvaluation {
            technical_score: 5.0,
            efficiency_score: 5.0,
            practices_score: 5.0,
            communication_score: 5.0,
            feedback: "  ".to_string(),
        };
        let r = response_from_llm("c1", "no idea", evaluation, &mut rng());
        assert!(UNCERTAIN_FEEDBACK.contains(&r.feedback.as_str()));
    }

    #[test]
    fn test_evaluation_prompt_includes_rubric_and_answer() {
        let q = question_by_id("c3").unwrap();
        let prompt = build_evaluation_prompt(q, "VLOOKUP with FALSE");
        assert!(prompt.contains(&q.question));
        assert!(prompt.contains("- technical: Correct VLOOKUP syntax"));
        assert!(prompt.contains("VLOOKUP with FALSE"));
        assert!(!prompt.contains("{answer}"));
    }

    #[test]
    fn test_evaluation_prompt_keeps_answer_verbatim() {
        let q = question_by_id("c3").unwrap();
        let answer = "I would use vlookup, see {json_only} for details";
        let prompt = build_evaluation_prompt(q, answer);
        assert!(prompt.contains(answer));
        assert_eq!(prompt.matches(JSON_ONLY_INSTRUCTION).count(), 1);
        assert!(prompt.contains("\"technical_score\": 7.5"));
    }
}
