//! Answer grading rules.
//!
//! One dispatch function switches on the question tag; there is no partial
//! credit anywhere. Short answers are compared after normalization
//! (trimmed, case-folded, inner whitespace collapsed).

use super::model::{ChoiceQuestion, Question};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attempt ceiling per question. Reaching it locks the question.
pub const MAX_ATTEMPTS: u8 = 3;

/// An incoming answer for one question of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    pub question_id: String,
    #[serde(default)]
    pub selected_option_ids: Option<Vec<String>>,
    #[serde(default)]
    pub short_answer: Option<String>,
}

/// What the learner actually submitted, kept on the answer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedResponse {
    Options(Vec<String>),
    Text(String),
}

/// Result of grading one submission against one question.
///
/// `Invalid` means the response shape does not fit the question type and
/// must not consume an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Invalid {
        reason: String,
    },
    Graded {
        is_correct: bool,
        recorded: RecordedResponse,
        /// Distractor-specific feedback for a selected wrong option, if the
        /// question carries one.
        distractor_feedback: Option<String>,
    },
}

pub fn normalize_answer(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Grades a submission. Pure; the session state machine applies the result.
pub fn evaluate(question: &Question, submission: &AnswerSubmission) -> Evaluation {
    match question {
        Question::McqSingle(q) => evaluate_single(q, submission),
        Question::McqMulti(q) => evaluate_multi(q, submission),
        Question::ShortText(q) => {
            let answer = submission.short_answer.as_deref().unwrap_or("").trim();
            if answer.is_empty() {
                return Evaluation::Invalid {
                    reason: "Enter a short answer before checking.".into(),
                };
            }
            let normalized = normalize_answer(answer);
            let is_correct = q
                .expected_answers
                .iter()
                .any(|expected| normalize_answer(expected) == normalized);
            Evaluation::Graded {
                is_correct,
                recorded: RecordedResponse::Text(answer.to_string()),
                distractor_feedback: None,
            }
        }
    }
}

fn evaluate_single(q: &ChoiceQuestion, submission: &AnswerSubmission) -> Evaluation {
    let selected = submission.selected_option_ids.as_deref().unwrap_or(&[]);
    if selected.len() != 1 {
        return Evaluation::Invalid {
            reason: "Select exactly one option.".into(),
        };
    }
    let chosen = &selected[0];
    let is_correct = q.correct_option_ids.iter().any(|id| id == chosen);
    let distractor_feedback = if is_correct {
        None
    } else {
        q.distractor_feedback.get(chosen).cloned()
    };
    Evaluation::Graded {
        is_correct,
        recorded: RecordedResponse::Options(selected.to_vec()),
        distractor_feedback,
    }
}

fn evaluate_multi(q: &ChoiceQuestion, submission: &AnswerSubmission) -> Evaluation {
    let selected: BTreeSet<&str> = submission
        .selected_option_ids
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(String::as_str)
        .collect();
    if selected.is_empty() {
        return Evaluation::Invalid {
            reason: "Select one or more options.".into(),
        };
    }
    let expected: BTreeSet<&str> = q.correct_option_ids.iter().map(String::as_str).collect();
    let is_correct = selected == expected;
    let distractor_feedback = if is_correct {
        None
    } else {
        selected
            .iter()
            .filter(|id| !expected.contains(*id))
            .find_map(|id| q.distractor_feedback.get(*id).cloned())
    };
    Evaluation::Graded {
        is_correct,
        recorded: RecordedResponse::Options(
            selected.into_iter().map(str::to_string).collect(),
        ),
        distractor_feedback,
    }
}

/// Builds the feedback string for an accepted (graded) submission.
pub fn feedback_for(
    question: &Question,
    is_correct: bool,
    locked: bool,
    attempts_remaining: u8,
    distractor_feedback: Option<&str>,
) -> String {
    if is_correct {
        return question.explanation().to_string();
    }
    if locked {
        return format!(
            "Out of attempts. The correct answer is: {}. {}",
            correct_answer_text(question),
            question.explanation()
        );
    }
    if let Some(feedback) = distractor_feedback {
        return feedback.to_string();
    }
    let noun = if attempts_remaining == 1 {
        "attempt"
    } else {
        "attempts"
    };
    format!("That's not correct. You have {attempts_remaining} {noun} remaining.")
}

fn correct_answer_text(question: &Question) -> String {
    match question {
        Question::McqSingle(q) | Question::McqMulti(q) => q
            .options
            .iter()
            .filter(|option| q.correct_option_ids.contains(&option.id))
            .map(|option| option.text.clone())
            .collect::<Vec<_>>()
            .join(", "),
        Question::ShortText(q) => q
            .expected_answers
            .iter()
            .filter(|answer| !answer.trim().is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", "),
    }
}
