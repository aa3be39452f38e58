//! Core domain for quizforge: the quiz model and validator, the grading
//! rules and the in-memory session engine. Provider clients and the
//! failover pipeline live in their own crates.

pub mod article;
pub mod error;
pub mod quiz;
pub mod session;

pub use article::SourceArticle;
pub use error::{FailureClass, ProviderFailure, QuizError, Result};
