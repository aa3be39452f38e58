//! Pulls the JSON object out of a raw model completion.
//!
//! Providers routinely wrap the payload in markdown fences or surround it
//! with prose despite instructions not to; this recovers the object without
//! ever modifying its content.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("valid regex"));

/// Returns the JSON object embedded in `text`, or `None` if there is none.
pub fn extract_json_object(text: &str) -> Option<String> {
    let stripped = text.trim();
    if stripped.starts_with('{') && stripped.ends_with('}') {
        return Some(stripped.to_string());
    }
    if let Some(captures) = FENCED_JSON.captures(stripped) {
        return Some(captures[1].to_string());
    }
    let first = stripped.find('{')?;
    let last = stripped.rfind('}')?;
    (first < last).then(|| stripped[first..=last].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_a_bare_object() {
        assert_eq!(
            extract_json_object("  {\"a\": 1}  ").as_deref(),
            Some("{\"a\": 1}")
        );
    }

    #[test]
    fn unwraps_markdown_fences() {
        let fenced = "Here you go:\n```json\n{\"a\": 1}\n```\n";
        assert_eq!(extract_json_object(fenced).as_deref(), Some("{\"a\": 1}"));
        let plain_fence = "```\n{\"a\": 1}\n```";
        assert_eq!(
            extract_json_object(plain_fence).as_deref(),
            Some("{\"a\": 1}")
        );
    }

    #[test]
    fn recovers_object_surrounded_by_prose() {
        let noisy = "Sure! The quiz is {\"a\": {\"b\": 2}} - enjoy.";
        assert_eq!(
            extract_json_object(noisy).as_deref(),
            Some("{\"a\": {\"b\": 2}}")
        );
    }

    #[test]
    fn reports_missing_object() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }
}
