//! Quiz domain model.
//!
//! A quiz is created once by the generation pipeline and never mutated
//! afterwards. Questions are a tagged sum type: three kinds share an
//! id/stem/explanation and diverge on grading data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed quiz shape enforced by the validator.
pub const QUESTION_COUNT: usize = 15;
pub const MCQ_SINGLE_COUNT: usize = 10;
pub const MCQ_MULTI_COUNT: usize = 2;
pub const SHORT_TEXT_COUNT: usize = 3;

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub id: String,
    pub text: String,
}

/// Shared shape of `mcq_single` and `mcq_multi` questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub id: String,
    pub stem: String,
    pub explanation: String,
    /// Ordered list of options as presented to the learner.
    pub options: Vec<ChoiceOption>,
    pub correct_option_ids: Vec<String>,
    /// Optional per-distractor feedback, keyed by incorrect option id.
    #[serde(default)]
    pub distractor_feedback: BTreeMap<String, String>,
}

/// A free-form question graded by normalized exact match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortTextQuestion {
    pub id: String,
    pub stem: String,
    pub explanation: String,
    /// Acceptable answers, matched case/whitespace-insensitively.
    pub expected_answers: Vec<String>,
    /// Context for any semantic grading layered on top of exact match.
    pub grading_context: String,
}

/// A quiz question. The serde tag matches the provider wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    McqSingle(ChoiceQuestion),
    McqMulti(ChoiceQuestion),
    ShortText(ShortTextQuestion),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    McqSingle,
    McqMulti,
    ShortText,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::McqSingle => "mcq_single",
            QuestionKind::McqMulti => "mcq_multi",
            QuestionKind::ShortText => "short_text",
        };
        f.write_str(name)
    }
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::McqSingle(q) | Question::McqMulti(q) => &q.id,
            Question::ShortText(q) => &q.id,
        }
    }

    pub fn stem(&self) -> &str {
        match self {
            Question::McqSingle(q) | Question::McqMulti(q) => &q.stem,
            Question::ShortText(q) => &q.stem,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            Question::McqSingle(q) | Question::McqMulti(q) => &q.explanation,
            Question::ShortText(q) => &q.explanation,
        }
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::McqSingle(_) => QuestionKind::McqSingle,
            Question::McqMulti(_) => QuestionKind::McqMulti,
            Question::ShortText(_) => QuestionKind::ShortText,
        }
    }
}

/// Reference to the article the quiz was generated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSource {
    pub title: String,
    pub url: String,
    pub page_id: u64,
    /// The (possibly truncated) extract text that was fed to the provider.
    pub extract_used: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
}

/// A complete, validated quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub quiz_id: String,
    pub topic: String,
    pub source: QuizSource,
    /// Exactly 15 questions in fixed category order:
    /// 10 `mcq_single`, then 2 `mcq_multi`, then 3 `short_text`.
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == question_id)
    }
}
