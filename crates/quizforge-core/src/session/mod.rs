//! Session store and answer state machine.

pub mod model;
pub mod store;

pub use model::{AnswerState, SessionRecord, SessionState, SubmissionOutcome, SubmissionStatus};
pub use store::SessionStore;
