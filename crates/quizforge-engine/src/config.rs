//! Environment-driven engine configuration.
//!
//! Parsing is tolerant: a malformed value falls back to its default instead
//! of failing startup, and unknown provider names are dropped from the
//! order list.

use crate::pipeline::FailoverPolicy;
use quizforge_core::FailureClass;
use quizforge_providers::{GeminiProvider, OpenAiCompatibleProvider, QuizProvider};
use std::env;
use std::sync::Arc;
use std::time::Duration;

pub const ALLOWED_PROVIDERS: [&str; 3] = ["openai", "perplexity", "gemini"];

pub const DEFAULT_TIMEOUT_MS: u64 = 90_000;
pub const DEFAULT_EXTRACT_MAX_CHARS: usize = 8_000;

/// Which failure classes are allowed to advance the pipeline to the next
/// provider. A class outside the trigger aborts generation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailoverTrigger {
    /// Provider-side errors only (transport and timeout).
    AnyError,
    /// Schema validation failures only.
    ValidationErrorOnly,
    /// Every failure class.
    #[default]
    All,
}

impl FailoverTrigger {
    pub fn permits(self, class: FailureClass) -> bool {
        match self {
            FailoverTrigger::All => true,
            FailoverTrigger::AnyError => {
                matches!(class, FailureClass::Timeout | FailureClass::Transport)
            }
            FailoverTrigger::ValidationErrorOnly => {
                matches!(class, FailureClass::SchemaInvalid)
            }
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "any-error" => Some(FailoverTrigger::AnyError),
            "validation-error-only" => Some(FailoverTrigger::ValidationErrorOnly),
            "all" => Some(FailoverTrigger::All),
            _ => None,
        }
    }
}

/// Credentials and model for one provider endpoint.
#[derive(Debug, Clone)]
pub struct EndpointSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

/// Recognized configuration surface of the generation pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub provider_order: Vec<String>,
    pub per_provider_timeout: Duration,
    pub max_retries_per_provider: u32,
    pub failover_trigger: FailoverTrigger,
    pub allow_mock: bool,
    pub force_mock: bool,
    pub extract_max_chars: usize,
    pub openai: EndpointSettings,
    pub perplexity: EndpointSettings,
    pub gemini: EndpointSettings,
}

impl Settings {
    pub fn from_env() -> Self {
        let provider_order = normalize_provider_order(env_csv(
            "QUIZ_PROVIDER_ORDER",
            &["openai", "perplexity", "gemini"],
        ));
        Self {
            provider_order,
            per_provider_timeout: Duration::from_millis(env_u64(
                "QUIZ_LLM_TIMEOUT_MS",
                DEFAULT_TIMEOUT_MS,
            )),
            max_retries_per_provider: env_u64("QUIZ_MAX_RETRIES_PER_PROVIDER", 0) as u32,
            failover_trigger: env::var("QUIZ_FAILOVER_TRIGGER")
                .ok()
                .and_then(|value| FailoverTrigger::parse(&value))
                .unwrap_or_default(),
            allow_mock: env_bool("QUIZ_ALLOW_MOCK", true),
            force_mock: env_bool("QUIZ_FORCE_MOCK", false),
            extract_max_chars: env_u64("QUIZ_EXTRACT_MAX_CHARS", DEFAULT_EXTRACT_MAX_CHARS as u64)
                as usize,
            openai: EndpointSettings {
                api_key: env_string("OPENAI_API_KEY", ""),
                base_url: env_string("OPENAI_BASE_URL", "https://api.openai.com/v1"),
                model: env_string("OPENAI_MODEL", "gpt-4o-mini"),
            },
            perplexity: EndpointSettings {
                api_key: env_string("PERPLEXITY_API_KEY", ""),
                base_url: env_string("PERPLEXITY_BASE_URL", "https://api.perplexity.ai"),
                model: env_string("PERPLEXITY_MODEL", "sonar"),
            },
            gemini: EndpointSettings {
                api_key: env_string("GEMINI_API_KEY", ""),
                base_url: env_string(
                    "GEMINI_BASE_URL",
                    "https://generativelanguage.googleapis.com/v1beta",
                ),
                model: env_string("GEMINI_MODEL", "gemini-2.5-flash"),
            },
        }
    }

    pub fn policy(&self) -> FailoverPolicy {
        FailoverPolicy {
            per_provider_timeout: self.per_provider_timeout,
            max_retries_per_provider: self.max_retries_per_provider,
            trigger: self.failover_trigger,
        }
    }

    /// Instantiates the configured providers in priority order.
    pub fn build_providers(&self) -> Vec<Arc<dyn QuizProvider>> {
        self.provider_order
            .iter()
            .filter_map(|name| self.build_provider(name))
            .collect()
    }

    fn build_provider(&self, name: &str) -> Option<Arc<dyn QuizProvider>> {
        match name {
            "openai" => Some(Arc::new(OpenAiCompatibleProvider::new(
                "openai",
                self.openai.api_key.clone(),
                self.openai.base_url.clone(),
                self.openai.model.clone(),
            ))),
            "perplexity" => Some(Arc::new(OpenAiCompatibleProvider::new(
                "perplexity",
                self.perplexity.api_key.clone(),
                self.perplexity.base_url.clone(),
                self.perplexity.model.clone(),
            ))),
            "gemini" => Some(Arc::new(GeminiProvider::new(
                self.gemini.api_key.clone(),
                self.gemini.base_url.clone(),
                self.gemini.model.clone(),
            ))),
            _ => None,
        }
    }
}

/// Drops unknown provider names; an empty result falls back to the default
/// order so a typo cannot disable generation entirely.
fn normalize_provider_order(raw: Vec<String>) -> Vec<String> {
    let filtered: Vec<String> = raw
        .into_iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| ALLOWED_PROVIDERS.contains(&name.as_str()))
        .collect();
    if filtered.is_empty() {
        ALLOWED_PROVIDERS.iter().map(|s| s.to_string()).collect()
    } else {
        filtered
    }
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn env_csv(name: &str, default: &[&str]) -> Vec<String> {
    match env::var(name) {
        Ok(value) => value
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_parses_recognized_values() {
        assert_eq!(
            FailoverTrigger::parse("any-error"),
            Some(FailoverTrigger::AnyError)
        );
        assert_eq!(
            FailoverTrigger::parse(" Validation-Error-Only "),
            Some(FailoverTrigger::ValidationErrorOnly)
        );
        assert_eq!(FailoverTrigger::parse("all"), Some(FailoverTrigger::All));
        assert_eq!(FailoverTrigger::parse("sometimes"), None);
    }

    #[test]
    fn trigger_classifies_failure_classes() {
        assert!(FailoverTrigger::All.permits(FailureClass::SchemaInvalid));
        assert!(FailoverTrigger::All.permits(FailureClass::Transport));
        assert!(FailoverTrigger::AnyError.permits(FailureClass::Timeout));
        assert!(!FailoverTrigger::AnyError.permits(FailureClass::SchemaInvalid));
        assert!(FailoverTrigger::ValidationErrorOnly.permits(FailureClass::SchemaInvalid));
        assert!(!FailoverTrigger::ValidationErrorOnly.permits(FailureClass::Transport));
    }

    #[test]
    fn unknown_provider_names_are_dropped() {
        let order = normalize_provider_order(vec![
            "openai".into(),
            "clippy".into(),
            " GEMINI ".into(),
        ]);
        assert_eq!(order, vec!["openai".to_string(), "gemini".to_string()]);
    }

    #[test]
    fn empty_provider_order_falls_back_to_default() {
        let order = normalize_provider_order(vec!["clippy".into()]);
        assert_eq!(order, vec!["openai", "perplexity", "gemini"]);
    }
}
