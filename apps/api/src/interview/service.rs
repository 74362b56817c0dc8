//! Interview orchestration — the one entry point the transport layer drives.
//!
//! Flow: start → {answer | timeout → (next question | summary)}* → summary.
//! Fallback order for questions: generation service → catalog → synthetic stub.
//! Every operation returns a well-formed outcome; nothing here propagates an error.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::interview::models::{
    CandidateResponse, Difficulty, Question, QuestionType, ROLE_ASSISTANT, ROLE_USER,
};
use crate::interview::question_gen::{ask_next_question, plan_next_question, QuestionSource};
use crate::interview::scoring::{
    evaluate_with_llm, response_from_llm, score_lexically, timed_out_response,
};
use crate::interview::session::InterviewSession;
use crate::interview::summary::summarize;
use crate::llm_client::TextGenerator;

pub const INTRO_MESSAGE: &str = "Hi there! 👋 I'm excited to chat with you about Excel today. Think of this as a friendly conversation where I'm curious about how you work with spreadsheets.

I'll ask you about different Excel scenarios - from basic formulas to data analysis tricks. Just explain your approach like you're helping a coworker who's stuck on a problem.

Don't worry about being perfect - I'm more interested in your thought process and practical knowledge. Ready to dive in?";

const ALREADY_COMPLETE_FEEDBACK: &str = "This interview is already complete. Start a new one to try again.";
const UNKNOWN_QUESTION_ID: &str = "unknown";

/// Suggested answer time for the question on screen: 60 / 90 / 120 seconds.
pub fn timer_seconds(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Beginner => 60,
        Difficulty::Intermediate => 90,
        Difficulty::Advanced | Difficulty::Expert => 120,
    }
}

/// Last-resort first question when neither generation nor the catalog yields one.
fn stub_question() -> Question {
    Question {
        id: "fallback_1".to_string(),
        question_type: QuestionType::Formula,
        difficulty: Difficulty::Beginner,
        question: "How would you calculate the sum of values in cells A1 through A10?".to_string(),
        expected_answer: "=SUM(A1:A10)".to_string(),
        scoring_criteria: BTreeMap::from([("basic".to_string(), "SUM function usage".to_string())]),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outcomes handed to the transport layer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub intro: String,
    pub question: String,
    pub timer: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u32>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    pub summary: String,
    pub score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Interviewer
// ────────────────────────────────────────────────────────────────────────────

/// Drives one session at a time through the interview.
/// Holds the generation seam, the evaluation toggle and the feedback RNG.
pub struct Interviewer {
    generator: Arc<dyn TextGenerator>,
    llm_evaluation: bool,
    rng: Mutex<StdRng>,
}

impl Interviewer {
    pub fn new(generator: Arc<dyn TextGenerator>, llm_evaluation: bool) -> Self {
        Self::with_rng(generator, llm_evaluation, StdRng::from_entropy())
    }

    /// Deterministic wording for tests.
    pub fn with_rng(generator: Arc<dyn TextGenerator>, llm_evaluation: bool, rng: StdRng) -> Self {
        Self {
            generator,
            llm_evaluation,
            rng: Mutex::new(rng),
        }
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Runs `f` with the feedback RNG. The lock is never held across an await.
    fn sample<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Replaces `session` with a fresh interview and asks the first question.
    pub async fn start_interview(&self, session: &mut InterviewSession) -> StartOutcome {
        *session = InterviewSession::new();
        info!("Starting interview {}", session.session_id);

        session.record_turn(ROLE_ASSISTANT, INTRO_MESSAGE);

        let question = match self.next_question(session).await {
            Some(text) => text,
            None => {
                warn!("No first question available — using stub question");
                let stub = stub_question();
                let text = stub.question.clone();
                session.set_current_question(stub);
                session.record_turn(ROLE_ASSISTANT, text.clone());
                text
            }
        };

        StartOutcome {
            intro: INTRO_MESSAGE.to_string(),
            question,
            timer: self.current_timer(session),
        }
    }

    /// Scores `answer` against the current question and advances the interview.
    pub async fn submit_answer(&self, session: &mut InterviewSession, answer: &str) -> TurnOutcome {
        if let Some(done) = self.reject_if_finished(session) {
            return done;
        }

        let response = self.evaluate(session, answer).await;
        session.record_turn(ROLE_USER, answer);
        self.advance(session, response).await
    }

    /// Records a zero-score response for the current question and advances.
    pub async fn handle_timeout(&self, session: &mut InterviewSession) -> TurnOutcome {
        if let Some(done) = self.reject_if_finished(session) {
            return done;
        }

        let question_id = session
            .current_question
            .as_ref()
            .map(|q| q.id.as_str())
            .unwrap_or("timeout");
        let response = timed_out_response(question_id);
        session.record_turn(ROLE_USER, response.answer.clone());
        self.advance(session, response).await
    }

    /// The final report and weighted overall score.
    /// Completes the session unless no responses were recorded yet.
    pub fn get_summary(&self, session: &mut InterviewSession) -> SummaryOutcome {
        let cached = session
            .final_report
            .clone()
            .filter(|_| session.is_completed());
        let summary = match cached {
            Some(report) => report,
            None => summarize(session),
        };
        SummaryOutcome {
            summary,
            score: session.overall_score(),
        }
    }

    // ── internals ──────────────────────────────────────────────────────────

    async fn next_question(&self, session: &mut InterviewSession) -> Option<String> {
        let plan = self.sample(|rng| plan_next_question(session, rng))?;
        let (text, source) = ask_next_question(self.generator(), session, plan).await?;
        if source == QuestionSource::Catalog {
            info!("Interview {} continuing on catalog questions", session.session_id);
        }
        Some(text)
    }

    fn current_timer(&self, session: &InterviewSession) -> u32 {
        let difficulty = session
            .current_question
            .as_ref()
            .map(|q| q.difficulty)
            .unwrap_or(Difficulty::Beginner);
        timer_seconds(difficulty)
    }

    /// A finished interview accepts no further responses.
    fn reject_if_finished(&self, session: &mut InterviewSession) -> Option<TurnOutcome> {
        if !session.is_completed() && !session.is_full() {
            return None;
        }
        warn!(
            "Interview {} is finished — ignoring further input",
            session.session_id
        );
        let summary = self.get_summary(session).summary;
        Some(TurnOutcome {
            feedback: Some(ALREADY_COMPLETE_FEEDBACK.to_string()),
            question: None,
            timer: None,
            completed: true,
            summary: Some(summary),
        })
    }

    /// LLM evaluation when enabled and a question is active, else lexical.
    async fn evaluate(&self, session: &InterviewSession, answer: &str) -> CandidateResponse {
        let question = match &session.current_question {
            Some(q) => q,
            None => {
                warn!("Answer received with no active question — scoring lexically");
                return self.sample(|rng| score_lexically(UNKNOWN_QUESTION_ID, answer, rng));
            }
        };

        if self.llm_evaluation {
            match evaluate_with_llm(self.generator(), question, answer).await {
                Ok(evaluation) => {
                    return self.sample(|rng| {
                        response_from_llm(&question.id, answer, evaluation, rng)
                    });
                }
                Err(e) => warn!("LLM evaluation failed: {e} — using lexical scoring"),
            }
        }

        self.sample(|rng| score_lexically(&question.id, answer, rng))
    }

    /// Records the response, then asks the next question or summarises.
    async fn advance(&self, session: &mut InterviewSession, response: CandidateResponse) -> TurnOutcome {
        let feedback = response.feedback.clone();
        info!(
            "Interview {}: response #{} recorded for {} (weighted {:.2})",
            session.session_id,
            session.responses().len() + 1,
            response.question_id,
            response.weighted_score()
        );

        if let Err(e) = session.record_response(response) {
            warn!("{e}");
        }

        if !session.is_full() {
            if let Some(question) = self.next_question(session).await {
                return TurnOutcome {
                    feedback: Some(feedback),
                    question: Some(question),
                    timer: Some(self.current_timer(session)),
                    completed: false,
                    summary: None,
                };
            }
            warn!(
                "Interview {} ended early after {} responses",
                session.session_id,
                session.responses().len()
            );
        }

        TurnOutcome {
            feedback: Some(feedback),
            question: None,
            timer: None,
            completed: true,
            summary: Some(summarize(session)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
