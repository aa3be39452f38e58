//! Boundary record handed over by the article resolver collaborator.

use serde::{Deserialize, Serialize};

/// A resolved source article, already confirmed by the user.
///
/// Resolution (topic search, disambiguation) happens outside the core; the
/// engine only consumes the final record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceArticle {
    pub title: String,
    pub page_id: u64,
    pub url: String,
    pub summary: String,
    /// Full extract text. The pipeline truncates it to the configured cap
    /// before prompting.
    pub extract: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_caption: Option<String>,
}
