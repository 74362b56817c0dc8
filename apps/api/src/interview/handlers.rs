//! Axum route handlers for the Interview API.
//!
//! Thin marshaling only: every handler locks the single session and hands it to
//! the `Interviewer`. Interview endpoints always answer 200 with a payload.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::catalog::{question_by_id, questions_by_difficulty};
use crate::interview::models::{Difficulty, InterviewState, Question};
use crate::interview::service::{StartOutcome, SummaryOutcome, TurnOutcome};
use crate::llm_client::{GenerationParams, MODEL};
use crate::state::AppState;

const CHECK_PROMPT: &str = "Generate a simple Excel question about SUM function.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct DifficultyQuery {
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub difficulty: Difficulty,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub struct SessionDebugResponse {
    pub session_id: Uuid,
    pub state: InterviewState,
    pub responses_count: usize,
    pub messages_count: usize,
    pub current_question_id: Option<String>,
    pub llm_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct LlmCheckResponse {
    pub llm_working: bool,
    pub model: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Interview flow
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/start
///
/// Discards any previous interview and returns the intro plus the first question.
pub async fn handle_start(State(state): State<AppState>) -> Json<StartOutcome> {
    let mut session = state.session.lock().await;
    Json(state.interviewer.start_interview(&mut session).await)
}

/// POST /api/answer
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Json<TurnOutcome> {
    let mut session = state.session.lock().await;
    Json(
        state
            .interviewer
            .submit_answer(&mut session, &request.answer)
            .await,
    )
}

/// POST /api/timeout
///
/// Called by the client when the question timer runs out.
pub async fn handle_timeout(State(state): State<AppState>) -> Json<TurnOutcome> {
    let mut session = state.session.lock().await;
    Json(state.interviewer.handle_timeout(&mut session).await)
}

/// GET /api/summary
pub async fn handle_summary(State(state): State<AppState>) -> Json<SummaryOutcome> {
    let mut session = state.session.lock().await;
    Json(state.interviewer.get_summary(&mut session))
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog lookups
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/questions?difficulty=beginner
pub async fn handle_list_questions(
    Query(params): Query<DifficultyQuery>,
) -> Result<Json<QuestionListResponse>, AppError> {
    let difficulty: Difficulty = params
        .difficulty
        .ok_or_else(|| AppError::Validation("difficulty query parameter is required".to_string()))?
        .parse()
        .map_err(AppError::Validation)?;
    let questions = questions_by_difficulty(difficulty)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(QuestionListResponse {
        difficulty,
        questions,
    }))
}

/// GET /api/questions/:id
pub async fn handle_get_question(Path(id): Path<String>) -> Result<Json<Question>, AppError> {
    question_by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Question {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Debug endpoints
// ────────────────────────────────────────────────────────────────────────────

/// GET /debug/session
pub async fn handle_debug_session(State(state): State<AppState>) -> Json<SessionDebugResponse> {
    let session = state.session.lock().await;
    Json(SessionDebugResponse {
        session_id: session.session_id,
        state: session.state,
        responses_count: session.responses().len(),
        messages_count: session.transcript().len(),
        current_question_id: session.current_question.as_ref().map(|q| q.id.clone()),
        llm_configured: state.config.llm_configured(),
    })
}

/// GET /debug/llm
///
/// Makes one live generation call. Failure is reported in the body, not as an error status.
pub async fn handle_debug_llm(State(state): State<AppState>) -> Json<LlmCheckResponse> {
    let result = state
        .interviewer
        .generator()
        .generate(CHECK_PROMPT, &GenerationParams::QUESTION)
        .await;

    Json(match result {
        Ok(text) => LlmCheckResponse {
            llm_working: true,
            model: MODEL,
            test_question: Some(text),
            error: None,
        },
        Err(e) => LlmCheckResponse {
            llm_working: false,
            model: MODEL,
            test_question: None,
            error: Some(e.to_string()),
        },
    })
}
