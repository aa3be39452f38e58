//! Generation engine: configuration, prompt construction, the provider
//! failover pipeline, the deterministic mock fallback and the service
//! facade that the API layer talks to.

pub mod config;
pub mod extract;
pub mod mock;
pub mod pipeline;
pub mod prompt;
pub mod service;

pub use config::{FailoverTrigger, Settings};
pub use pipeline::{FailoverPolicy, GeneratedQuiz, GenerationPipeline, MOCK_PROVIDER};
pub use service::{CreatedQuiz, QuizService};
