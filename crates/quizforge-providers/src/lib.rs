//! Quiz-generation provider clients.
//!
//! Every backend implements the same small capability trait; the failover
//! pipeline depends only on this interface, which is what makes providers
//! interchangeable and testable with scripted doubles.

pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatibleProvider;

/// Error surface of a provider client, normalized by the pipeline into
/// failure classes.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("provider returned an empty completion")]
    EmptyResponse,

    #[error("provider is not configured")]
    NotConfigured,
}

/// One text-generation call. The prompt pair is built by the engine; the
/// model is fixed per provider instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// A quiz-generation backend.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Stable identifier used in configuration and telemetry.
    fn name(&self) -> &str;

    /// Whether credentials are present. Unconfigured providers are skipped
    /// by the pipeline without consuming their attempt budget.
    fn is_configured(&self) -> bool;

    /// Issues one generation call and returns the raw completion text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(err.to_string())
    }
}
