use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// Question hardness tier. Ordered: beginner < intermediate < advanced < expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Formula,
    DataAnalysis,
    PivotTable,
    Vba,
    BestPractices,
}

/// Interview lifecycle. Only `Intro`, `Summary` and `Completed` gate behaviour;
/// the middle three mirror the tier of the question currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    Intro,
    Warmup,
    Core,
    Advanced,
    Summary,
    Completed,
}

impl InterviewState {
    /// In-progress state for a question of the given tier.
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Beginner => InterviewState::Warmup,
            Difficulty::Intermediate => InterviewState::Core,
            Difficulty::Advanced | Difficulty::Expert => InterviewState::Advanced,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// A single interview question. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub question: String,
    /// Informational reference only; answers are never checked against it.
    pub expected_answer: String,
    /// Scoring dimension → rubric text.
    pub scoring_criteria: BTreeMap<String, String>,
}

/// Policy weights for the overall score: technical, efficiency, practices, communication.
pub const SCORE_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];

/// A scored answer. Created once per answered question, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub question_id: String,
    pub answer: String,
    pub technical_score: f64,
    pub efficiency_score: f64,
    pub practices_score: f64,
    pub communication_score: f64,
    pub feedback: String,
}

impl CandidateResponse {
    pub fn scores(&self) -> [f64; 4] {
        [
            self.technical_score,
            self.efficiency_score,
            self.practices_score,
            self.communication_score,
        ]
    }

    /// Weighted 0.4/0.3/0.2/0.1 score used for the overall result.
    pub fn weighted_score(&self) -> f64 {
        self.scores()
            .iter()
            .zip(SCORE_WEIGHTS.iter())
            .map(|(score, weight)| score * weight)
            .sum()
    }

    /// Unweighted mean of the four sub-scores. Display and prompt context only.
    pub fn composite_score(&self) -> f64 {
        self.scores().iter().sum::<f64>() / 4.0
    }
}

pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_USER: &str = "user";

/// One (role, text) turn of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTurn {
    pub role: String,
    pub content: String,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(scores: [f64; 4]) -> CandidateResponse {
        CandidateResponse {
            question_id: "w1".to_string(),
            answer: "answer".to_string(),
            technical_score: scores[0],
            efficiency_score: scores[1],
            practices_score: scores[2],
            communication_score: scores[3],
            feedback: String::new(),
        }
    }

    #[test]
    fn test_difficulty_ordering() {
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
        assert!(Difficulty::Advanced < Difficulty::Expert);
    }

    #[test]
    fn test_difficulty_parses_case_insensitively() {
        assert_eq!("Advanced".parse::<Difficulty>(), Ok(Difficulty::Advanced));
        assert_eq!(" beginner ".parse::<Difficulty>(), Ok(Difficulty::Beginner));
        assert!("guru".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_weighted_score_example() {
        // 8*0.4 + 6*0.3 + 5*0.2 + 3*0.1 = 3.2 + 1.8 + 1.0 + 0.3 = 6.3
        let r = response([8.0, 6.0, 5.0, 3.0]);
        assert!((r.weighted_score() - 6.3).abs() < 1e-9, "got {}", r.weighted_score());
    }

    #[test]
    fn test_composite_score_is_plain_mean() {
        let r = response([7.5, 8.0, 7.0, 8.5]);
        assert!((r.composite_score() - 7.75).abs() < 1e-9);
    }

    #[test]
    fn test_state_tracks_question_tier() {
        assert_eq!(
            InterviewState::for_difficulty(Difficulty::Beginner),
            InterviewState::Warmup
        );
        assert_eq!(
            InterviewState::for_difficulty(Difficulty::Intermediate),
            InterviewState::Core
        );
        assert_eq!(
            InterviewState::for_difficulty(Difficulty::Expert),
            InterviewState::Advanced
        );
    }

    #[test]
    fn test_question_serializes_type_field() {
        let q = Question {
            id: "c2".to_string(),
            question_type: QuestionType::PivotTable,
            difficulty: Difficulty::Intermediate,
            question: "Pivot?".to_string(),
            expected_answer: String::new(),
            scoring_criteria: BTreeMap::new(),
        };
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "pivot_table");
        assert_eq!(value["difficulty"], "intermediate");
    }
}
