//! Prompt construction for quiz generation.

use quizforge_core::SourceArticle;
use quizforge_providers::GenerationRequest;

const SYSTEM_PROMPT: &str = "You are a deterministic quiz JSON generator for an educational app. \
Return exactly one valid JSON object and nothing else. \
No markdown, no prose, no code fences, no comments. \
All values must satisfy type constraints exactly.";

/// Builds the generation request for one article, truncating the extract to
/// the configured cap.
pub fn quiz_generation_request(
    topic: &str,
    article: &SourceArticle,
    extract_max_chars: usize,
) -> GenerationRequest {
    let extract = truncate_chars(&article.extract, extract_max_chars);
    let user_prompt = format!(
        r#"Generate one quiz JSON object with exactly 15 questions from the provided article context.

Required schema:
{{
  "quiz_id": "string",
  "topic": "string",
  "source": {{
    "title": "string",
    "url": "string",
    "page_id": number,
    "extract_used": "string",
    "image_url": "string|null",
    "image_caption": "string|null"
  }},
  "questions": [ 10 x mcq_single, then 2 x mcq_multi, then 3 x short_text ]
}}

Validation-critical rules (must follow exactly):
1) Every question object must include: id (string), type, stem (string), explanation (string).
2) Question ids must be exactly q01..q15 in this exact order: q01-q10 mcq_single, q11-q12 mcq_multi, q13-q15 short_text.
3) options must be a list of objects like {{"id":"a","text":"..."}}, never a list of strings.
4) correct_option_ids must be a list of option-id strings; exactly one id for mcq_single, at least two for mcq_multi.
5) distractor_feedback must be an object mapping incorrect option ids to feedback strings.
6) For short_text, include expected_answers (non-empty list of strings) and grading_context (string).
7) For every MCQ question, use exactly 4 options with ids "a","b","c","d".
8) Ground every question in the provided article context only; keep stems unique and specific.
9) Return one JSON object only, no code fences, no placeholders or template tokens.

Topic: {topic}
Article title: {title}
Article URL: {url}
Article page_id: {page_id}
Summary: {summary}
Extract:
{extract}"#,
        topic = topic,
        title = article.title,
        url = article.url,
        page_id = article.page_id,
        summary = article.summary,
        extract = extract,
    );

    GenerationRequest {
        system_prompt: SYSTEM_PROMPT.to_string(),
        user_prompt,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> SourceArticle {
        SourceArticle {
            title: "Water cycle".into(),
            page_id: 33567,
            url: "https://example.org/wiki/Water_cycle".into(),
            summary: "Movement of water on Earth.".into(),
            extract: "The water cycle describes the continuous movement of water.".into(),
            image_url: None,
            image_caption: None,
        }
    }

    #[test]
    fn prompt_carries_topic_and_article_context() {
        let request = quiz_generation_request("Water cycle", &article(), 8000);
        assert!(request.user_prompt.contains("Topic: Water cycle"));
        assert!(request.user_prompt.contains("page_id: 33567"));
        assert!(request.user_prompt.contains("continuous movement of water"));
        assert!(request.system_prompt.contains("quiz JSON generator"));
    }

    #[test]
    fn extract_is_truncated_to_the_cap() {
        let request = quiz_generation_request("Water cycle", &article(), 9);
        assert!(request.user_prompt.ends_with("The water"));
    }
}
