//! Turns the model's free-form text reply into typed quiz questions.
//!
//! Replies are rarely clean JSON: models wrap output in commentary or code
//! fences despite being told not to. The extractor tries, in order, a
//! ```` ```json ```` fence, a bare ```` ``` ```` fence, then the first
//! balanced `{...}` span in the text. Whatever is found must parse and
//! validate completely; a reply that fails any structural check is rejected
//! whole rather than partially admitted.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::MalformedQuizDataError;

/// A single validated multiple-choice question. `correct_index` always
/// indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: [String; 4],
    pub correct_index: usize,
    pub explanation: String,
}

/// Wire shape of the model reply, before validation.
#[derive(Debug, Deserialize)]
struct RawQuiz {
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_answer: i64,
    #[serde(default)]
    explanation: String,
}

/// Extract the span between a fence opening (e.g. "```json\n") and the next
/// closing fence.
fn fenced_span<'a>(text: &'a str, opening: &str) -> Option<&'a str> {
    let start = text.find(opening)? + opening.len();
    let end = text[start..].find("```")?;
    Some(text[start..start + end].trim())
}

/// Find the first balanced top-level `{...}` span. The scanner walks bytes
/// with string/escape awareness so braces inside string values do not count.
fn first_balanced_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escape = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escape {
                escape = false;
                continue;
            }
            match b {
                b'\\' => escape = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        return start.map(|s| &text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate a JSON object within the reply text. First matching strategy wins:
/// fenced ```` ```json ```` block, bare fenced block, first balanced object.
pub fn extract_json_span(text: &str) -> Option<&str> {
    fenced_span(text, "```json\n")
        .or_else(|| fenced_span(text, "```\n"))
        .or_else(|| first_balanced_object(text))
}

/// Parse and validate a raw model reply into quiz questions.
///
/// Validation is strict: a top-level `questions` array must exist and every
/// element needs a non-empty question text, exactly 4 options, and a correct
/// index in `[0,3]`. A missing explanation is tolerated as an empty string.
#[instrument(target = "quizcraft::parser", skip(text), fields(text_len = text.len()))]
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, MalformedQuizDataError> {
    let span = extract_json_span(text).ok_or(MalformedQuizDataError::NoJsonFound)?;
    debug!(target = "quizcraft::parser", span_len = span.len(), "located JSON span");

    let raw: RawQuiz = serde_json::from_str(span)
        .map_err(|e| MalformedQuizDataError::JsonDeserialization(e, text.to_string()))?;

    if raw.questions.is_empty() {
        return Err(MalformedQuizDataError::NoQuestions);
    }

    let mut questions = Vec::with_capacity(raw.questions.len());
    for (index, q) in raw.questions.into_iter().enumerate() {
        if q.question.trim().is_empty() {
            return Err(MalformedQuizDataError::EmptyPrompt { index });
        }
        let options: [String; 4] = match q.options.try_into() {
            Ok(options) => options,
            Err(v) => {
                return Err(MalformedQuizDataError::WrongOptionCount { index, found: v.len() })
            }
        };
        if !(0..=3).contains(&q.correct_answer) {
            return Err(MalformedQuizDataError::CorrectIndexOutOfRange {
                index,
                value: q.correct_answer,
            });
        }
        questions.push(QuizQuestion {
            prompt: q.question,
            options,
            correct_index: q.correct_answer as usize,
            explanation: q.explanation,
        });
    }

    debug!(target = "quizcraft::parser", count = questions.len(), "validated quiz questions");
    Ok(questions)
}
