//! Quiz model, schema validation and grading rules.

pub mod grading;
pub mod model;
pub mod validate;

#[cfg(test)]
pub(crate) mod testutil;

pub use grading::{normalize_answer, AnswerSubmission, MAX_ATTEMPTS};
pub use model::{
    ChoiceOption, ChoiceQuestion, Question, QuestionKind, Quiz, QuizSource, ShortTextQuestion,
};
pub use validate::{parse_and_validate, validate, SchemaViolation};
