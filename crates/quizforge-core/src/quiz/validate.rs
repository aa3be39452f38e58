//! Schema validation for raw generation-provider output.
//!
//! The validator fails closed: the first violation found is reported and
//! nothing is repaired or dropped. It runs identically for every provider
//! and for the bundled mock payload, so quiz quality is uniform regardless
//! of which backend produced it.

use super::model::{
    ChoiceQuestion, Question, QuestionKind, Quiz, ShortTextQuestion, MCQ_MULTI_COUNT,
    MCQ_SINGLE_COUNT, QUESTION_COUNT,
};
use crate::error::QuizError;
use std::collections::HashSet;
use thiserror::Error;

/// First schema violation found in a quiz payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("payload does not parse as a quiz object: {0}")]
    Malformed(String),

    #[error("quiz must contain exactly {expected} questions, found {found}")]
    QuestionCount { expected: usize, found: usize },

    #[error("question at index {index} must be {expected}, found {found}")]
    CategoryOrder {
        index: usize,
        expected: QuestionKind,
        found: QuestionKind,
    },

    #[error("duplicate question id '{0}'")]
    DuplicateQuestionId(String),

    #[error("question '{id}': {detail}")]
    Question { id: String, detail: String },
}

impl From<SchemaViolation> for QuizError {
    fn from(violation: SchemaViolation) -> Self {
        QuizError::SchemaInvalid(violation.to_string())
    }
}

/// Parses a raw JSON payload and enforces every quiz invariant.
pub fn parse_and_validate(raw: &str) -> Result<Quiz, SchemaViolation> {
    let quiz: Quiz =
        serde_json::from_str(raw).map_err(|err| SchemaViolation::Malformed(err.to_string()))?;
    validate(&quiz)?;
    Ok(quiz)
}

/// Enforces the fixed quiz shape on an already-deserialized quiz.
pub fn validate(quiz: &Quiz) -> Result<(), SchemaViolation> {
    if quiz.questions.len() != QUESTION_COUNT {
        return Err(SchemaViolation::QuestionCount {
            expected: QUESTION_COUNT,
            found: quiz.questions.len(),
        });
    }

    let mut seen_ids = HashSet::new();
    for (index, question) in quiz.questions.iter().enumerate() {
        let expected = expected_kind(index);
        if question.kind() != expected {
            return Err(SchemaViolation::CategoryOrder {
                index,
                expected,
                found: question.kind(),
            });
        }
        if !seen_ids.insert(question.id().to_string()) {
            return Err(SchemaViolation::DuplicateQuestionId(question.id().into()));
        }
        validate_question(question)?;
    }
    Ok(())
}

fn expected_kind(index: usize) -> QuestionKind {
    if index < MCQ_SINGLE_COUNT {
        QuestionKind::McqSingle
    } else if index < MCQ_SINGLE_COUNT + MCQ_MULTI_COUNT {
        QuestionKind::McqMulti
    } else {
        QuestionKind::ShortText
    }
}

fn validate_question(question: &Question) -> Result<(), SchemaViolation> {
    if question.id().trim().is_empty() {
        return Err(SchemaViolation::Question {
            id: question.id().into(),
            detail: "question id must not be blank".into(),
        });
    }
    if question.stem().trim().is_empty() {
        return Err(violation(question, "stem must not be blank"));
    }

    match question {
        Question::McqSingle(q) => validate_choice(question, q, 1, 1),
        Question::McqMulti(q) => validate_choice(question, q, 2, usize::MAX),
        Question::ShortText(q) => validate_short_text(question, q),
    }
}

fn validate_choice(
    question: &Question,
    q: &ChoiceQuestion,
    min_correct: usize,
    max_correct: usize,
) -> Result<(), SchemaViolation> {
    if q.options.len() < 2 {
        return Err(violation(question, "choice question needs at least 2 options"));
    }

    let mut option_ids = HashSet::new();
    for option in &q.options {
        if option.id.trim().is_empty() || option.text.trim().is_empty() {
            return Err(violation(question, "options must have non-blank id and text"));
        }
        if !option_ids.insert(option.id.as_str()) {
            return Err(violation(
                question,
                &format!("duplicate option id '{}'", option.id),
            ));
        }
    }

    let correct: HashSet<&str> = q.correct_option_ids.iter().map(String::as_str).collect();
    if correct.len() != q.correct_option_ids.len() {
        return Err(violation(question, "correct_option_ids contains duplicates"));
    }
    if let Some(unknown) = correct.iter().find(|id| !option_ids.contains(**id)) {
        return Err(violation(
            question,
            &format!("correct option id '{unknown}' is not among the options"),
        ));
    }
    if correct.len() < min_correct || correct.len() > max_correct {
        let detail = match question.kind() {
            QuestionKind::McqSingle => "mcq_single must have exactly one correct option".into(),
            _ => format!(
                "mcq_multi must have at least {min_correct} correct options, found {}",
                correct.len()
            ),
        };
        return Err(violation(question, &detail));
    }

    if let Some(unknown) = q
        .distractor_feedback
        .keys()
        .find(|id| !option_ids.contains(id.as_str()))
    {
        return Err(violation(
            question,
            &format!("distractor_feedback key '{unknown}' is not among the options"),
        ));
    }
    Ok(())
}

fn validate_short_text(
    question: &Question,
    q: &ShortTextQuestion,
) -> Result<(), SchemaViolation> {
    if !q.expected_answers.iter().any(|a| !a.trim().is_empty()) {
        return Err(violation(
            question,
            "short_text needs at least one non-empty expected answer",
        ));
    }
    Ok(())
}

fn violation(question: &Question, detail: &str) -> SchemaViolation {
    SchemaViolation::Question {
        id: question.id().into(),
        detail: detail.into(),
    }
}
