//! Error types shared across the quizforge workspace.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuizError>;

/// A shared error type for the quiz engine.
///
/// Submission-level conditions (`invalid`, `locked`) are statuses on the
/// submission outcome, not errors; only terminal conditions live here.
#[derive(Error, Debug, Clone)]
pub enum QuizError {
    /// Generation output did not match the required quiz shape.
    #[error("quiz payload is invalid: {0}")]
    SchemaInvalid(String),

    /// Every configured provider (and the mock fallback, if enabled) was
    /// exhausted. Per-attempt diagnostics are kept for telemetry.
    #[error("quiz generation failed after {} attempt(s) across all providers", .attempts.len())]
    GenerationFailed { attempts: Vec<ProviderFailure> },

    /// Unknown or already-deleted session id.
    #[error("session not found: '{0}'")]
    SessionNotFound(String),
}

/// One failed generation attempt, recorded for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    pub provider: String,
    /// 1-based attempt number within this provider's budget.
    pub attempt: u32,
    pub class: FailureClass,
    pub message: String,
}

/// Classification of a generation failure, used by the failover policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The attempt exceeded the per-attempt time budget.
    Timeout,
    /// Network or HTTP-level failure reported by the provider client.
    Transport,
    /// The provider answered but the payload failed schema validation.
    SchemaInvalid,
    /// The provider has no credentials and was skipped.
    NotConfigured,
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FailureClass::Timeout => "timeout",
            FailureClass::Transport => "transport",
            FailureClass::SchemaInvalid => "schema_invalid",
            FailureClass::NotConfigured => "not_configured",
        };
        f.write_str(name)
    }
}
