//! Session State — the mutable record of one interview's progress.
//!
//! The session is owned by the transport layer and passed by `&mut` into every
//! core operation. Multi-candidate support would key these by `session_id`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::interview::models::{
    CandidateResponse, InterviewState, Question, TranscriptTurn, ROLE_ASSISTANT,
};

/// The interview ends after exactly this many recorded responses.
pub const MAX_RESPONSES: usize = 6;

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("Interview already holds the maximum of {limit} responses")]
    ResponseLimitReached { limit: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub session_id: Uuid,
    pub state: InterviewState,
    pub current_question: Option<Question>,
    responses: Vec<CandidateResponse>,
    transcript: Vec<TranscriptTurn>,
    /// The report produced when the session reached `Completed`.
    pub final_report: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: InterviewState::Intro,
            current_question: None,
            responses: Vec::new(),
            transcript: Vec::new(),
            final_report: None,
            started_at: Utc::now(),
        }
    }

    /// Responses in chronological order. Append-only.
    pub fn responses(&self) -> &[CandidateResponse] {
        &self.responses
    }

    pub fn transcript(&self) -> &[TranscriptTurn] {
        &self.transcript
    }

    pub fn is_full(&self) -> bool {
        self.responses.len() >= MAX_RESPONSES
    }

    pub fn is_completed(&self) -> bool {
        self.state == InterviewState::Completed
    }

    /// Appends a transcript turn. Roles are free-form tags
    /// ("assistant"/"interviewer", "user"/"candidate").
    pub fn record_turn(&mut self, role: &str, text: impl Into<String>) {
        self.transcript.push(TranscriptTurn {
            role: role.to_string(),
            content: text.into(),
            at: Utc::now(),
        });
    }

    /// Appends a response unless the interview already holds `MAX_RESPONSES`.
    pub fn record_response(&mut self, response: CandidateResponse) -> Result<(), SessionError> {
        if self.is_full() {
            return Err(SessionError::ResponseLimitReached {
                limit: MAX_RESPONSES,
            });
        }
        self.responses.push(response);
        Ok(())
    }

    /// Installs the active question and moves the lifecycle to its tier.
    pub fn set_current_question(&mut self, question: Question) {
        self.state = InterviewState::for_difficulty(question.difficulty);
        self.current_question = Some(question);
    }

    /// Arithmetic mean of per-response weighted scores. 0.0 with no responses.
    pub fn overall_score(&self) -> f64 {
        if self.responses.is_empty() {
            return 0.0;
        }
        let total: f64 = self.responses.iter().map(|r| r.weighted_score()).sum();
        total / self.responses.len() as f64
    }

    /// Mean composite score of the last two responses, if any.
    pub fn recent_performance(&self) -> Option<f64> {
        let start = self.responses.len().saturating_sub(2);
        let recent = &self.responses[start..];
        if recent.is_empty() {
            return None;
        }
        Some(recent.iter().map(|r| r.composite_score()).sum::<f64>() / recent.len() as f64)
    }

    /// Up to the last `limit` assistant turns that look like questions, oldest first.
    pub fn previous_questions(&self, limit: usize) -> Vec<&str> {
        let asked: Vec<&str> = self
            .transcript
            .iter()
            .filter(|t| t.role == ROLE_ASSISTANT && t.content.contains('?'))
            .map(|t| t.content.as_str())
            .collect();
        let start = asked.len().saturating_sub(limit);
        asked[start..].to_vec()
    }
}
