//! Session domain model.
//!
//! A session is one user's in-progress quiz instance. Score, completion and
//! the navigation cursor are derived from the answer map on every read so
//! they can never drift from the per-question state.

use crate::quiz::grading::MAX_ATTEMPTS;
use crate::quiz::Quiz;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mutable per-question answer state. `attempts_used` only ever grows and
/// `locked` never flips back to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerProgress {
    pub question_id: String,
    pub attempts_used: u8,
    pub is_correct: bool,
    pub locked: bool,
    pub selected_option_ids: Option<Vec<String>>,
    pub short_answer: Option<String>,
    pub feedback: Option<String>,
}

impl AnswerProgress {
    fn new(question_id: &str) -> Self {
        Self {
            question_id: question_id.to_string(),
            attempts_used: 0,
            is_correct: false,
            locked: false,
            selected_option_ids: None,
            short_answer: None,
            feedback: None,
        }
    }

    pub fn attempts_remaining(&self) -> u8 {
        MAX_ATTEMPTS.saturating_sub(self.attempts_used)
    }

    fn view(&self) -> AnswerState {
        AnswerState {
            question_id: self.question_id.clone(),
            attempts_used: self.attempts_used,
            attempts_remaining: self.attempts_remaining(),
            is_correct: self.is_correct,
            locked: self.locked,
            selected_option_ids: self.selected_option_ids.clone(),
            short_answer: self.short_answer.clone(),
            feedback: self.feedback.clone(),
        }
    }
}

/// Read-only answer state exposed to the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerState {
    pub question_id: String,
    pub attempts_used: u8,
    pub attempts_remaining: u8,
    pub is_correct: bool,
    pub locked: bool,
    pub selected_option_ids: Option<Vec<String>>,
    pub short_answer: Option<String>,
    pub feedback: Option<String>,
}

/// Outcome status of one answer submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Well-formed, evaluated, one attempt consumed.
    Accepted,
    /// Question already locked; nothing re-evaluated, no attempt consumed.
    Locked,
    /// Response shape did not match the question type; no attempt consumed.
    Invalid,
}

/// Per-call result of `SessionStore::submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub status: SubmissionStatus,
    pub attempts_used: u8,
    pub attempts_remaining: u8,
    pub is_correct: bool,
    pub locked: bool,
    pub feedback: String,
}

/// One stored session. Owned exclusively by the store; all mutation goes
/// through the per-session lock.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub session_id: String,
    pub topic: String,
    pub quiz: Quiz,
    pub answers: BTreeMap<String, AnswerProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session_id: String, topic: &str, quiz: Quiz) -> Self {
        let answers = quiz
            .questions
            .iter()
            .map(|question| (question.id().to_string(), AnswerProgress::new(question.id())))
            .collect();
        let now = Utc::now();
        Self {
            session_id,
            topic: topic.to_string(),
            quiz,
            answers,
            created_at: now,
            updated_at: now,
        }
    }

    /// Count of questions locked with a correct answer.
    pub fn score(&self) -> u32 {
        self.answers
            .values()
            .filter(|answer| answer.locked && answer.is_correct)
            .count() as u32
    }

    /// A session is complete once every question is locked.
    pub fn is_complete(&self) -> bool {
        self.answers.values().all(|answer| answer.locked)
    }

    /// Navigation cursor: the first unlocked question in quiz order, or the
    /// last index once everything is locked.
    pub fn current_index(&self) -> usize {
        self.quiz
            .questions
            .iter()
            .position(|question| {
                self.answers
                    .get(question.id())
                    .is_some_and(|answer| !answer.locked)
            })
            .unwrap_or(self.quiz.questions.len().saturating_sub(1))
    }

    pub fn state(&self) -> SessionState {
        let answers = self
            .answers
            .iter()
            .map(|(id, answer)| (id.clone(), answer.view()))
            .collect();
        SessionState {
            session_id: self.session_id.clone(),
            score: self.score(),
            total_questions: self.quiz.questions.len(),
            current_index: self.current_index(),
            complete: self.is_complete(),
            answers,
            quiz: self.quiz.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Snapshot returned by the session read contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub score: u32,
    pub total_questions: usize,
    pub current_index: usize,
    pub complete: bool,
    pub answers: BTreeMap<String, AnswerState>,
    pub quiz: Quiz,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
