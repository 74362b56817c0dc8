//! Question Generator — produces the next question for a session.
//!
//! Flow: terminal check → difficulty by progress → LLM generation →
//!       first catalog entry at that tier → end the interview early.
//!
//! No retries: a single generation failure goes straight to the catalog.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::interview::catalog::questions_by_difficulty;
use crate::interview::models::{Difficulty, InterviewState, Question, QuestionType, ROLE_ASSISTANT};
use crate::interview::prompts::{
    ADVANCED_STARTERS, BEGINNER_STARTERS, INTERMEDIATE_STARTERS, QUESTION_PROMPT_TEMPLATE,
};
use crate::interview::session::{InterviewSession, MAX_RESPONSES};
use crate::llm_client::prompts::{fill_template, INTERVIEWER_PERSONA};
use crate::llm_client::{GenerationParams, TextGenerator};

const EXAMPLE_QUESTIONS: usize = 2;
const PREVIOUS_QUESTIONS: usize = 3;
const PREVIOUS_QUESTION_CHARS: usize = 80;

/// Where the installed question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSource {
    Generated,
    Catalog,
}

/// Everything decided before the external call.
#[derive(Debug, Clone)]
pub struct QuestionPlan {
    pub difficulty: Difficulty,
    /// 1-based position of the question in the interview.
    pub ordinal: usize,
    pub prompt: String,
}

/// Three-tier ramp: 0–1 prior responses → beginner, 2–3 → intermediate, 4+ → advanced.
pub fn difficulty_for_progress(responses: usize) -> Difficulty {
    match responses {
        0 | 1 => Difficulty::Beginner,
        2 | 3 => Difficulty::Intermediate,
        _ => Difficulty::Advanced,
    }
}

fn starters(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Beginner => &BEGINNER_STARTERS,
        Difficulty::Intermediate => &INTERMEDIATE_STARTERS,
        Difficulty::Advanced | Difficulty::Expert => &ADVANCED_STARTERS,
    }
}

fn focus(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "formulas and basic functions",
        Difficulty::Intermediate => "data analysis and intermediate functions",
        Difficulty::Advanced | Difficulty::Expert => "advanced functions and best practices",
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn build_question_prompt(session: &InterviewSession, difficulty: Difficulty, starter: &str) -> String {
    let performance_context = session
        .recent_performance()
        .map(|avg| format!("Recent performance: {avg:.1}/10. "))
        .unwrap_or_default();

    let examples = questions_by_difficulty(difficulty)
        .iter()
        .take(EXAMPLE_QUESTIONS)
        .map(|q| format!("- {}", q.question))
        .collect::<Vec<_>>()
        .join("\n");

    let asked = session.previous_questions(PREVIOUS_QUESTIONS);
    let previous_questions = if asked.is_empty() {
        String::new()
    } else {
        let lines = asked
            .iter()
            .map(|q| format!("- {}...", truncate_chars(q, PREVIOUS_QUESTION_CHARS)))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\nPrevious questions asked:\n{lines}")
    };

    let ordinal = (session.responses().len() + 1).to_string();
    let total = MAX_RESPONSES.to_string();

    fill_template(
        QUESTION_PROMPT_TEMPLATE,
        &[
            ("persona", INTERVIEWER_PERSONA),
            ("difficulty", difficulty.as_str()),
            ("focus", focus(difficulty)),
            ("ordinal", &ordinal),
            ("total", &total),
            ("starter", starter),
            ("performance_context", &performance_context),
            ("examples", &examples),
            ("previous_questions", &previous_questions),
        ],
    )
}

/// Decides the next question's tier and prompt.
/// Returns `None` and moves the session to `Summary` once it holds six responses.
pub fn plan_next_question<R: Rng + ?Sized>(
    session: &mut InterviewSession,
    rng: &mut R,
) -> Option<QuestionPlan> {
    if session.is_full() {
        info!(
            "Interview {} reached {} responses — moving to summary",
            session.session_id, MAX_RESPONSES
        );
        session.state = InterviewState::Summary;
        return None;
    }

    let difficulty = difficulty_for_progress(session.responses().len());
    let starter = starters(difficulty).choose(rng).copied().unwrap_or_default();

    Some(QuestionPlan {
        difficulty,
        ordinal: session.responses().len() + 1,
        prompt: build_question_prompt(session, difficulty, starter),
    })
}

/// Wraps generated text as a synthetic question. No ground truth exists for it.
fn generated_question(ordinal: usize, difficulty: Difficulty, text: String) -> Question {
    Question {
        id: format!("gen_{ordinal}"),
        question_type: QuestionType::Formula,
        difficulty,
        question: text,
        expected_answer: "Dynamic evaluation".to_string(),
        scoring_criteria: BTreeMap::from([(
            "dynamic".to_string(),
            "LLM-based evaluation".to_string(),
        )]),
    }
}

fn install(session: &mut InterviewSession, question: Question) -> String {
    let text = question.question.clone();
    session.set_current_question(question);
    session.record_turn(ROLE_ASSISTANT, text.clone());
    text
}

/// Executes a plan: generation first, then the catalog, else ends the interview.
pub async fn ask_next_question(
    generator: &dyn TextGenerator,
    session: &mut InterviewSession,
    plan: QuestionPlan,
) -> Option<(String, QuestionSource)> {
    match generator.generate(&plan.prompt, &GenerationParams::QUESTION).await {
        Ok(text) if !text.trim().is_empty() => {
            let question = generated_question(plan.ordinal, plan.difficulty, text.trim().to_string());
            info!(
                "Question #{} generated ({}) for interview {}",
                plan.ordinal, plan.difficulty, session.session_id
            );
            return Some((install(session, question), QuestionSource::Generated));
        }
        Ok(_) => warn!("Question generation returned blank text — using catalog fallback"),
        Err(e) => warn!("Question generation failed: {e} — using catalog fallback"),
    }

    match questions_by_difficulty(plan.difficulty).first() {
        Some(fallback) => {
            info!(
                "Question #{} served from catalog ({})",
                plan.ordinal, fallback.id
            );
            Some((install(session, (*fallback).clone()), QuestionSource::Catalog))
        }
        None => {
            warn!(
                "No catalog questions at {} — ending interview {} early",
                plan.difficulty, session.session_id
            );
            session.state = InterviewState::Summary;
            None
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
