//! Facade consumed by the API layer.
//!
//! One method per boundary operation; routing, CORS and rate limiting live
//! outside the core. Quota accounting, if any, must count calls to
//! `create_quiz` — internal provider attempts are telemetry, not chargeable
//! events.

use crate::config::Settings;
use crate::pipeline::GenerationPipeline;
use quizforge_core::quiz::{AnswerSubmission, Quiz};
use quizforge_core::session::{SessionState, SessionStore, SubmissionOutcome};
use quizforge_core::{Result, SourceArticle};

/// Result of a successful quiz creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedQuiz {
    pub session_id: String,
    pub quiz: Quiz,
    pub provider_used: String,
}

/// Ties the generation pipeline to the session store.
pub struct QuizService {
    pipeline: GenerationPipeline,
    store: SessionStore,
}

impl QuizService {
    pub fn new(pipeline: GenerationPipeline) -> Self {
        Self {
            pipeline,
            store: SessionStore::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(GenerationPipeline::from_settings(settings))
    }

    /// Generates a quiz for a confirmed article and opens a session for it.
    ///
    /// A client that abandons the request mid-generation does not cancel
    /// the pipeline; the session it produces stays retrievable.
    pub async fn create_quiz(&self, topic: &str, article: &SourceArticle) -> Result<CreatedQuiz> {
        let generated = self.pipeline.generate(topic, article).await?;
        let session_id = self.store.create(topic, generated.quiz.clone()).await;
        Ok(CreatedQuiz {
            session_id,
            quiz: generated.quiz,
            provider_used: generated.provider,
        })
    }

    pub async fn submit_answer(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<SubmissionOutcome> {
        self.store.submit(session_id, submission).await
    }

    pub async fn session_state(&self, session_id: &str) -> Result<SessionState> {
        self.store.state(session_id).await
    }

    /// Deletes a session. Missing ids are ignored.
    pub async fn reset_session(&self, session_id: &str) {
        self.store.reset(session_id).await;
    }
}
