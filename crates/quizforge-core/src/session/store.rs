//! In-memory session store and the answer state machine.
//!
//! Many sessions are served in parallel, but every operation against a
//! single session id is serialized through that session's own lock, so two
//! concurrent submissions can never both consume the same attempt slot or
//! push `attempts_used` past the ceiling.

use super::model::{SessionRecord, SessionState, SubmissionOutcome, SubmissionStatus};
use crate::error::{QuizError, Result};
use crate::quiz::grading::{evaluate, feedback_for, Evaluation, RecordedResponse, MAX_ATTEMPTS};
use crate::quiz::{AnswerSubmission, Quiz};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Holds every live session. Sessions do not survive process restarts.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionRecord>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session for a freshly generated quiz and returns its id.
    ///
    /// Ids are uuid v4, so they cannot be guessed or enumerated.
    pub async fn create(&self, topic: &str, quiz: Quiz) -> String {
        let session_id = Uuid::new_v4().simple().to_string();
        let record = SessionRecord::new(session_id.clone(), topic, quiz);
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), Arc::new(Mutex::new(record)));
        tracing::info!(%session_id, %topic, "session created");
        session_id
    }

    async fn record(&self, session_id: &str) -> Result<Arc<Mutex<SessionRecord>>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| QuizError::SessionNotFound(session_id.to_string()))
    }

    /// Returns the derived session snapshot.
    pub async fn state(&self, session_id: &str) -> Result<SessionState> {
        let record = self.record(session_id).await?;
        let record = record.lock().await;
        Ok(record.state())
    }

    /// Applies one answer submission to the addressed question.
    ///
    /// The attempt/lock transition commits fully or not at all: `invalid`
    /// and `locked` outcomes leave the session untouched.
    pub async fn submit(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<SubmissionOutcome> {
        let record = self.record(session_id).await?;
        let mut record = record.lock().await;

        let Some(question) = record.quiz.question(&submission.question_id).cloned() else {
            return Ok(SubmissionOutcome {
                status: SubmissionStatus::Invalid,
                attempts_used: 0,
                attempts_remaining: MAX_ATTEMPTS,
                is_correct: false,
                locked: false,
                feedback: "Question not found.".into(),
            });
        };

        let progress = record
            .answers
            .get_mut(question.id())
            .ok_or_else(|| QuizError::SessionNotFound(session_id.to_string()))?;

        if progress.locked {
            return Ok(SubmissionOutcome {
                status: SubmissionStatus::Locked,
                attempts_used: progress.attempts_used,
                attempts_remaining: progress.attempts_remaining(),
                is_correct: progress.is_correct,
                locked: true,
                feedback: progress
                    .feedback
                    .clone()
                    .unwrap_or_else(|| "Question is locked.".into()),
            });
        }

        match evaluate(&question, submission) {
            Evaluation::Invalid { reason } => Ok(SubmissionOutcome {
                status: SubmissionStatus::Invalid,
                attempts_used: progress.attempts_used,
                attempts_remaining: progress.attempts_remaining(),
                is_correct: false,
                locked: false,
                feedback: reason,
            }),
            Evaluation::Graded {
                is_correct,
                recorded,
                distractor_feedback,
            } => {
                progress.attempts_used += 1;
                progress.is_correct = is_correct;
                if is_correct || progress.attempts_used >= MAX_ATTEMPTS {
                    progress.locked = true;
                }
                let feedback = feedback_for(
                    &question,
                    is_correct,
                    progress.locked,
                    progress.attempts_remaining(),
                    distractor_feedback.as_deref(),
                );
                progress.feedback = Some(feedback.clone());
                match recorded {
                    RecordedResponse::Options(ids) => {
                        progress.selected_option_ids = Some(ids);
                    }
                    RecordedResponse::Text(text) => progress.short_answer = Some(text),
                }

                let outcome = SubmissionOutcome {
                    status: SubmissionStatus::Accepted,
                    attempts_used: progress.attempts_used,
                    attempts_remaining: progress.attempts_remaining(),
                    is_correct,
                    locked: progress.locked,
                    feedback,
                };
                record.updated_at = Utc::now();
                Ok(outcome)
            }
        }
    }

    /// Deletes a session. Idempotent: a missing id is not an error.
    pub async fn reset(&self, session_id: &str) {
        if self.sessions.write().await.remove(session_id).is_some() {
            tracing::info!(%session_id, "session reset");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::testutil::sample_quiz;

    fn options(question_id: &str, selected: &[&str]) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.into(),
            selected_option_ids: Some(selected.iter().map(|s| s.to_string()).collect()),
            short_answer: None,
        }
    }

    fn text(question_id: &str, answer: &str) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.into(),
            selected_option_ids: None,
            short_answer: Some(answer.into()),
        }
    }

    async fn store_with_session() -> (SessionStore, String) {
        let store = SessionStore::new();
        let session_id = store.create("Cell biology", sample_quiz()).await;
        (store, session_id)
    }

    #[tokio::test]
    async fn fresh_session_starts_with_zero_attempts() {
        let (store, id) = store_with_session().await;
        let state = store.state(&id).await.unwrap();
        assert_eq!(state.score, 0);
        assert_eq!(state.total_questions, 15);
        assert_eq!(state.current_index, 0);
        assert!(!state.complete);
        assert!(state
            .answers
            .values()
            .all(|a| a.attempts_used == 0 && !a.locked && a.attempts_remaining == 3));
    }

    #[tokio::test]
    async fn correct_answer_locks_immediately() {
        let (store, id) = store_with_session().await;
        // First attempt wrong, second correct: locks on attempt 2.
        store.submit(&id, &options("q01", &["b"])).await.unwrap();
        let outcome = store.submit(&id, &options("q01", &["a"])).await.unwrap();
        assert_eq!(outcome.status, SubmissionStatus::Accepted);
        assert!(outcome.is_correct);
        assert!(outcome.locked);
        assert_eq!(outcome.attempts_used, 2);

        let state = store.state(&id).await.unwrap();
        assert_eq!(state.score, 1);
        assert_eq!(state.current_index, 1);
    }

    #[tokio::test]
    async fn three_misses_lock_incorrect_and_fourth_is_rejected() {
        let (store, id) = store_with_session().await;
        for attempt in 1..=3u8 {
            let outcome = store.submit(&id, &options("q01", &["c"])).await.unwrap();
            assert_eq!(outcome.status, SubmissionStatus::Accepted);
            assert_eq!(outcome.attempts_used, attempt);
            assert_eq!(outcome.locked, attempt == 3);
        }

        let fourth = store.submit(&id, &options("q01", &["a"])).await.unwrap();
        assert_eq!(fourth.status, SubmissionStatus::Locked);
        assert_eq!(fourth.attempts_used, 3);
        assert!(!fourth.is_correct);

        let state = store.state(&id).await.unwrap();
        assert_eq!(state.answers["q01"].attempts_used, 3);
        assert_eq!(state.score, 0);
    }

    #[tokio::test]
    async fn exhausted_feedback_reveals_the_answer() {
        let (store, id) = store_with_session().await;
        for _ in 0..2 {
            store.submit(&id, &options("q01", &["c"])).await.unwrap();
        }
        let third = store.submit(&id, &options("q01", &["c"])).await.unwrap();
        assert!(third.locked);
        assert!(third.feedback.contains("Out of attempts"));
        assert!(third.feedback.contains("Correct option for q01"));
    }

    #[tokio::test]
    async fn distractor_feedback_is_preferred_when_present() {
        let (store, id) = store_with_session().await;
        let with_feedback = store.submit(&id, &options("q01", &["b"])).await.unwrap();
        assert!(with_feedback.feedback.contains("misreads the article"));

        let without = store.submit(&id, &options("q01", &["c"])).await.unwrap();
        assert!(without.feedback.contains("1 attempt remaining"));
    }

    #[tokio::test]
    async fn invalid_submission_consumes_no_attempt() {
        let (store, id) = store_with_session().await;
        let empty = store.submit(&id, &options("q01", &[])).await.unwrap();
        assert_eq!(empty.status, SubmissionStatus::Invalid);
        assert_eq!(empty.attempts_used, 0);

        let blank = store.submit(&id, &text("q13", "  ")).await.unwrap();
        assert_eq!(blank.status, SubmissionStatus::Invalid);

        let unknown = store.submit(&id, &options("q99", &["a"])).await.unwrap();
        assert_eq!(unknown.status, SubmissionStatus::Invalid);

        let state = store.state(&id).await.unwrap();
        assert!(state.answers.values().all(|a| a.attempts_used == 0));
    }

    #[tokio::test]
    async fn short_text_is_whitespace_and_case_insensitive() {
        let (store, id) = store_with_session().await;
        let outcome = store.submit(&id, &text("q13", "  mitochondria ")).await.unwrap();
        assert!(outcome.is_correct);
        assert!(outcome.locked);
    }

    #[tokio::test]
    async fn perfect_run_scores_fifteen() {
        let (store, id) = store_with_session().await;
        for index in 1..=10 {
            let qid = format!("q{index:02}");
            store.submit(&id, &options(&qid, &["a"])).await.unwrap();
        }
        store.submit(&id, &options("q11", &["a", "b"])).await.unwrap();
        store.submit(&id, &options("q12", &["b", "a"])).await.unwrap();
        store.submit(&id, &text("q13", "Mitochondria")).await.unwrap();
        store.submit(&id, &text("q14", "evaporation")).await.unwrap();
        store.submit(&id, &text("q15", "OSMOSIS")).await.unwrap();

        let state = store.state(&id).await.unwrap();
        assert_eq!(state.score, 15);
        assert!(state.complete);
        assert_eq!(state.current_index, 14);
    }

    #[tokio::test]
    async fn reset_is_idempotent_and_forgets_the_session() {
        let (store, id) = store_with_session().await;
        store.reset("no-such-session").await;
        store.reset(&id).await;
        store.reset(&id).await;
        assert!(matches!(
            store.state(&id).await,
            Err(QuizError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = SessionStore::new();
        assert!(matches!(
            store.state("missing").await,
            Err(QuizError::SessionNotFound(_))
        ));
        assert!(matches!(
            store.submit("missing", &options("q01", &["a"])).await,
            Err(QuizError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_submissions_never_exceed_the_attempt_ceiling() {
        let store = Arc::new(SessionStore::new());
        let session_id = store.create("Cell biology", sample_quiz()).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = store.clone();
            let session_id = session_id.clone();
            handles.push(tokio::spawn(async move {
                store.submit(&session_id, &options("q01", &["c"])).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            let outcome = handle.await.unwrap().unwrap();
            if outcome.status == SubmissionStatus::Accepted {
                accepted += 1;
            } else {
                assert_eq!(outcome.status, SubmissionStatus::Locked);
            }
        }
        assert_eq!(accepted, 3);

        let state = store.state(&session_id).await.unwrap();
        assert_eq!(state.answers["q01"].attempts_used, 3);
    }
}
