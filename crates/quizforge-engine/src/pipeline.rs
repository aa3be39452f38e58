//! Provider failover pipeline.
//!
//! Providers are tried strictly in configured order, one attempt at a time,
//! each attempt time-boxed. Failover is a data-driven policy decision over
//! the classified failure, never speculative parallelism, so provider
//! priority (and billing order) is preserved. Attempt-level outcomes are
//! telemetry only; nothing here is persisted.

use crate::config::{FailoverTrigger, Settings, DEFAULT_EXTRACT_MAX_CHARS};
use crate::extract::extract_json_object;
use crate::mock;
use crate::prompt::quiz_generation_request;
use quizforge_core::quiz::{parse_and_validate, Quiz};
use quizforge_core::{FailureClass, ProviderFailure, QuizError, Result, SourceArticle};
use quizforge_providers::{GenerationRequest, ProviderError, QuizProvider};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Sentinel provider name attached to deterministic fallback quizzes.
pub const MOCK_PROVIDER: &str = "mock";

/// Failover policy applied per provider attempt.
#[derive(Debug, Clone, Copy)]
pub struct FailoverPolicy {
    pub per_provider_timeout: Duration,
    pub max_retries_per_provider: u32,
    pub trigger: FailoverTrigger,
}

/// A validated quiz plus the provider that produced it (observability only,
/// never business logic).
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuiz {
    pub quiz: Quiz,
    pub provider: String,
}

/// Turns a confirmed source article into a schema-valid quiz through an
/// ordered list of interchangeable providers.
pub struct GenerationPipeline {
    providers: Vec<Arc<dyn QuizProvider>>,
    policy: FailoverPolicy,
    allow_mock: bool,
    force_mock: bool,
    extract_max_chars: usize,
}

impl GenerationPipeline {
    pub fn new(providers: Vec<Arc<dyn QuizProvider>>, policy: FailoverPolicy) -> Self {
        Self {
            providers,
            policy,
            allow_mock: true,
            force_mock: false,
            extract_max_chars: DEFAULT_EXTRACT_MAX_CHARS,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.build_providers(), settings.policy())
            .with_mock_fallback(settings.allow_mock)
            .with_force_mock(settings.force_mock)
            .with_extract_cap(settings.extract_max_chars)
    }

    /// Enables or disables the deterministic mock fallback.
    pub fn with_mock_fallback(mut self, allow: bool) -> Self {
        self.allow_mock = allow;
        self
    }

    /// Bypasses all providers and serves the mock directly.
    pub fn with_force_mock(mut self, force: bool) -> Self {
        self.force_mock = force;
        self
    }

    pub fn with_extract_cap(mut self, max_chars: usize) -> Self {
        self.extract_max_chars = max_chars;
        self
    }

    /// Runs the failover loop until one provider yields a quiz that passes
    /// schema validation.
    ///
    /// Every raw success is validated identically regardless of provider;
    /// there is no partially-valid acceptance path. Exhausting all
    /// providers falls back to the mock when permitted, otherwise fails
    /// with the per-provider diagnostics.
    pub async fn generate(&self, topic: &str, article: &SourceArticle) -> Result<GeneratedQuiz> {
        if self.force_mock {
            tracing::info!("force-mock enabled, bypassing all providers");
            return Ok(GeneratedQuiz {
                quiz: mock::mock_quiz()?,
                provider: MOCK_PROVIDER.to_string(),
            });
        }

        let request = quiz_generation_request(topic, article, self.extract_max_chars);
        let mut failures: Vec<ProviderFailure> = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();
            if !provider.is_configured() {
                tracing::info!(provider = %name, "provider not configured, skipping");
                failures.push(ProviderFailure {
                    provider: name,
                    attempt: 0,
                    class: FailureClass::NotConfigured,
                    message: "no credentials configured".into(),
                });
                continue;
            }

            let budget = self.policy.max_retries_per_provider + 1;
            for attempt in 1..=budget {
                match self.attempt(provider.as_ref(), &request).await {
                    Ok(quiz) => {
                        tracing::info!(provider = %name, attempt, "quiz generated and validated");
                        return Ok(GeneratedQuiz {
                            quiz,
                            provider: name,
                        });
                    }
                    Err((class, message)) => {
                        tracing::warn!(
                            provider = %name,
                            attempt,
                            %class,
                            %message,
                            "generation attempt failed"
                        );
                        failures.push(ProviderFailure {
                            provider: name.clone(),
                            attempt,
                            class,
                            message,
                        });
                        if !self.policy.trigger.permits(class) {
                            // This failure class is not failover-eligible:
                            // surface the terminal error right away.
                            return Err(QuizError::GenerationFailed { attempts: failures });
                        }
                    }
                }
            }
        }

        if self.allow_mock {
            tracing::info!(
                failed_attempts = failures.len(),
                "all providers exhausted, serving deterministic mock quiz"
            );
            return Ok(GeneratedQuiz {
                quiz: mock::mock_quiz()?,
                provider: MOCK_PROVIDER.to_string(),
            });
        }
        Err(QuizError::GenerationFailed { attempts: failures })
    }

    /// One time-boxed provider call followed by extraction and validation.
    async fn attempt(
        &self,
        provider: &dyn QuizProvider,
        request: &GenerationRequest,
    ) -> std::result::Result<Quiz, (FailureClass, String)> {
        let raw = match timeout(self.policy.per_provider_timeout, provider.generate(request)).await
        {
            Err(_elapsed) => {
                return Err((
                    FailureClass::Timeout,
                    format!(
                        "attempt exceeded the {}ms budget",
                        self.policy.per_provider_timeout.as_millis()
                    ),
                ));
            }
            Ok(Err(ProviderError::Timeout)) => {
                return Err((FailureClass::Timeout, "provider reported a timeout".into()));
            }
            Ok(Err(err)) => return Err((FailureClass::Transport, err.to_string())),
            Ok(Ok(raw)) => raw,
        };

        let Some(payload) = extract_json_object(&raw) else {
            return Err((
                FailureClass::SchemaInvalid,
                "completion contains no JSON object".into(),
            ));
        };
        parse_and_validate(&payload)
            .map_err(|violation| (FailureClass::SchemaInvalid, violation.to_string()))
    }
}
