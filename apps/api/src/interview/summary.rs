//! Summary Generator — aggregates all responses into the final assessment report.
//!
//! Never fails: a formatting error degrades to a minimal report.

use std::fmt::{self, Write};

use tracing::{error, info};

use crate::interview::models::{CandidateResponse, InterviewState, ROLE_ASSISTANT};
use crate::interview::session::InterviewSession;

const REPORT_TITLE: &str = "EXCEL SKILLS ASSESSMENT REPORT";
const RULE_WIDTH: usize = 50;
const ANSWER_PREVIEW_CHARS: usize = 100;

pub const INCOMPLETE_REPORT: &str = "EXCEL SKILLS ASSESSMENT REPORT
==================================================

No responses were recorded during this interview session.
Please restart the interview to complete your assessment.

Status: Incomplete
Recommendation: Retake the assessment when ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Lower bounds are inclusive: 8.5 → Expert, 7.0 → Advanced, 5.5 → Intermediate.
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            SkillLevel::Expert
        } else if score >= 7.0 {
            SkillLevel::Advanced
        } else if score >= 5.5 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

fn qualitative_tag(average: f64) -> &'static str {
    if average >= 7.0 {
        "Good"
    } else if average >= 5.0 {
        "Average"
    } else {
        "Needs Improvement"
    }
}

fn recommendation(overall: f64) -> &'static str {
    if overall >= 8.0 {
        "Recommended: Strong Excel skills demonstrated. Ready for advanced analytical roles."
    } else if overall >= 6.0 {
        "Recommended: Good foundation with room for growth. Consider advanced Excel training."
    } else {
        "Not Recommended: Fundamental Excel training required before proceeding."
    }
}

/// Dimension label (padded for alignment) and improvement suggestion, in report order.
const DIMENSIONS: [(&str, &str); 4] = [
    (
        "Technical Accuracy   ",
        "1. Technical Knowledge: Focus on Excel formulas and functions",
    ),
    (
        "Efficiency           ",
        "2. Efficiency: Learn optimal approaches for data analysis",
    ),
    (
        "Best Practices       ",
        "3. Best Practices: Study professional Excel modeling standards",
    ),
    (
        "Communication        ",
        "4. Communication: Practice explaining technical concepts clearly",
    ),
];

/// Escapes text for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// First 100 characters of the answer, with "..." when anything was cut, escaped.
pub fn answer_preview(answer: &str) -> String {
    let mut chars = answer.char_indices();
    match chars.nth(ANSWER_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", escape_html(&answer[..cut])),
        None => escape_html(answer),
    }
}

/// Per-dimension arithmetic means: technical, efficiency, practices, communication.
fn dimension_averages(responses: &[CandidateResponse]) -> [f64; 4] {
    let count = responses.len() as f64;
    let mut sums = [0.0; 4];
    for response in responses {
        for (sum, score) in sums.iter_mut().zip(response.scores()) {
            *sum += score;
        }
    }
    sums.map(|s| s / count)
}

fn write_report<W: Write>(
    out: &mut W,
    responses: &[CandidateResponse],
    overall: f64,
) -> fmt::Result {
    let averages = dimension_averages(responses);
    let level = SkillLevel::from_score(overall);

    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(out, "OVERALL PERFORMANCE")?;
    writeln!(out, "Score: {overall:.1}/10 | Level: {}", level.label())?;
    writeln!(out)?;

    writeln!(out, "COMPETENCY BREAKDOWN")?;
    for ((label, _), avg) in DIMENSIONS.iter().zip(averages) {
        writeln!(out, "{label}{avg:.1}/10 | {}", qualitative_tag(avg))?;
    }
    writeln!(out)?;

    writeln!(out, "AREAS FOR IMPROVEMENT")?;
    let mut any_improvement = false;
    for ((_, suggestion), avg) in DIMENSIONS.iter().zip(averages) {
        if avg < 7.0 {
            writeln!(out, "{suggestion}")?;
            any_improvement = true;
        }
    }
    if !any_improvement {
        writeln!(out, "No significant areas for improvement identified.")?;
    }
    writeln!(out)?;

    writeln!(out, "INTERVIEW TRANSCRIPT")?;
    for (i, response) in responses.iter().enumerate() {
        let n = i + 1;
        writeln!(out, "Q{n}: [Question {n} from interview]")?;
        writeln!(out, "A{n}: {}", answer_preview(&response.answer))?;
        writeln!(out, "Score: {:.1}/10", response.composite_score())?;
        writeln!(out, "Feedback: {}", escape_html(&response.feedback))?;
        writeln!(out)?;
    }

    writeln!(out, "RECOMMENDATION")?;
    writeln!(out, "{}", recommendation(overall))?;
    writeln!(out)?;
    writeln!(out, "Questions Answered: {}", responses.len())?;
    write!(out, "Assessment Complete")
}

fn minimal_report(answered: usize) -> String {
    format!(
        "{REPORT_TITLE}\n{}\n\nInterview completed with {answered} questions answered.\n\n\
         Thank you for participating in the Excel skills assessment.\n\
         Please retake the interview for a complete evaluation.\n\n\
         Status: Completed\nAssessment Complete",
        "=".repeat(RULE_WIDTH)
    )
}

/// Renders into a fresh `W`. A `String` sink never fails; the minimal report covers sinks that can.
fn render_report<W>(responses: &[CandidateResponse], overall: f64) -> String
where
    W: Write + Default + Into<String>,
{
    let mut out = W::default();
    match write_report(&mut out, responses, overall) {
        Ok(()) => out.into(),
        Err(e) => {
            error!("Summary formatting failed: {e} — returning minimal report");
            minimal_report(responses.len())
        }
    }
}

/// Builds the report text without touching the session.
pub fn build_report(responses: &[CandidateResponse], overall: f64) -> String {
    if responses.is_empty() {
        return INCOMPLETE_REPORT.to_string();
    }
    render_report::<String>(responses, overall)
}

/// Produces the final report, records it, and completes the session.
/// A session with no responses gets the incomplete report and is left untouched.
pub fn summarize(session: &mut InterviewSession) -> String {
    if session.responses().is_empty() {
        return INCOMPLETE_REPORT.to_string();
    }

    session.state = InterviewState::Summary;
    let report = build_report(session.responses(), session.overall_score());

    session.record_turn(ROLE_ASSISTANT, report.clone());
    session.final_report = Some(report.clone());
    session.state = InterviewState::Completed;
    info!(
        "Interview {} completed: {} responses, overall {:.2}",
        session.session_id,
        session.responses().len(),
        session.overall_score()
    );
    report
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
