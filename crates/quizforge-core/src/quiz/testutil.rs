//! Quiz fixtures shared by the crate's tests.

use super::model::{ChoiceOption, ChoiceQuestion, Question, Quiz, QuizSource, ShortTextQuestion};
use std::collections::BTreeMap;

fn choice(id: &str, option_ids: &[&str], correct: &[&str]) -> ChoiceQuestion {
    let options = option_ids
        .iter()
        .map(|oid| ChoiceOption {
            id: (*oid).into(),
            text: if correct.contains(oid) {
                format!("Correct option for {id}")
            } else {
                format!("Distractor {oid} for {id}")
            },
        })
        .collect();
    // Feedback only on option "b", so tests can exercise both the
    // distractor-specific and the generic fallback paths.
    let mut distractor_feedback = BTreeMap::new();
    if !correct.contains(&"b") {
        distractor_feedback.insert("b".to_string(), format!("Option b of {id} misreads the article."));
    }
    ChoiceQuestion {
        id: id.into(),
        stem: format!("Stem of question {id}?"),
        explanation: format!("Explanation for {id}."),
        options,
        correct_option_ids: correct.iter().map(|s| s.to_string()).collect(),
        distractor_feedback,
    }
}

fn short(id: &str, expected: &[&str]) -> ShortTextQuestion {
    ShortTextQuestion {
        id: id.into(),
        stem: format!("Stem of question {id}?"),
        explanation: format!("Explanation for {id}."),
        expected_answers: expected.iter().map(|s| s.to_string()).collect(),
        grading_context: format!("Grading context for {id}."),
    }
}

/// A schema-valid quiz: q01-q10 single (correct "a"), q11-q12 multi
/// (correct {"a","b"}), q13-q15 short text (q13 expects "Mitochondria").
pub(crate) fn sample_quiz() -> Quiz {
    let mut questions = Vec::new();
    for index in 1..=10 {
        let id = format!("q{index:02}");
        questions.push(Question::McqSingle(choice(&id, &["a", "b", "c", "d"], &["a"])));
    }
    for index in 11..=12 {
        let id = format!("q{index:02}");
        questions.push(Question::McqMulti(choice(
            &id,
            &["a", "b", "c", "d", "e"],
            &["a", "b"],
        )));
    }
    questions.push(Question::ShortText(short("q13", &["Mitochondria"])));
    questions.push(Question::ShortText(short("q14", &["Evaporation", "vaporisation"])));
    questions.push(Question::ShortText(short("q15", &["Osmosis"])));

    Quiz {
        quiz_id: "quiz-fixture".into(),
        topic: "Cell biology".into(),
        source: QuizSource {
            title: "Cell (biology)".into(),
            url: "https://example.org/wiki/Cell_(biology)".into(),
            page_id: 4230,
            extract_used: "Cells are the basic structural units of living organisms.".into(),
            image_url: None,
            image_caption: None,
        },
        questions,
    }
}
