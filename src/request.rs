use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_QUESTIONS: u32 = 1;
pub const MAX_QUESTIONS: u32 = 20;
pub const DEFAULT_QUESTIONS: u32 = 5;

/// Minimum quiz time limit in minutes. Inputs below this clamp up rather
/// than being rejected, matching the clamping policy used for the question
/// count.
pub const MIN_TIME_LIMIT_MINUTES: u32 = 1;

/// Difficulty tier for generated quizzes. Each tier maps to a fixed
/// elaboration string that is embedded in the generation prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty string, falling back to `Medium` for anything
    /// unrecognized (case insensitive).
    pub fn parse_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::Easy => "Use simple vocabulary, straightforward questions, and obvious distractors. Focus on recall and basic understanding.",
            Self::Medium => "Use moderate complexity. Mix recall with some application. Include a few tricky distractors.",
            Self::Hard => "Use advanced vocabulary, multi-step reasoning, and subtle distractors. Require deep understanding and application.",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// Clamp a requested question count into `[MIN_QUESTIONS, MAX_QUESTIONS]`.
pub fn clamp_question_count(n: i64) -> u32 {
    n.clamp(MIN_QUESTIONS as i64, MAX_QUESTIONS as i64) as u32
}

/// Parse a textual question count; non-numeric input defaults to
/// `DEFAULT_QUESTIONS`, then clamps.
pub fn question_count_from_str(raw: &str) -> u32 {
    raw.trim()
        .parse::<i64>()
        .map(clamp_question_count)
        .unwrap_or(DEFAULT_QUESTIONS)
}

/// Clamp a time limit in minutes up to the minimum.
pub fn clamp_time_limit_minutes(minutes: i64) -> u32 {
    minutes.max(MIN_TIME_LIMIT_MINUTES as i64) as u32
}

/// A single quiz generation request. Constructed fresh per attempt and never
/// persisted. The source text is validated at construction; the question
/// count is clamped rather than rejected.
#[derive(Debug, Clone)]
pub struct QuizRequest {
    source_text: String,
    question_count: u32,
    difficulty: Difficulty,
}

impl QuizRequest {
    pub fn new(
        source_text: impl Into<String>,
        question_count: u32,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError> {
        let source_text = source_text.into();
        if source_text.trim().is_empty() {
            return Err(ValidationError::EmptyNotes);
        }
        Ok(Self {
            source_text,
            question_count: clamp_question_count(question_count as i64),
            difficulty,
        })
    }

    /// Build a request from individual notes, joined with blank lines.
    pub fn from_notes<I, S>(
        notes: I,
        question_count: u32,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = notes
            .into_iter()
            .map(|n| n.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self::new(joined, question_count, difficulty)
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Assemble the natural-language instruction payload for the model:
    /// role description, formatting requirements, difficulty elaboration,
    /// the notes themselves, and the strict JSON-only output contract.
    pub fn build_prompt(&self) -> String {
        let n = self.question_count;
        format!(
            "You are an educational quiz generator. Based on the following notes, create a quiz with exactly {n} multiple choice questions. Difficulty: {difficulty}. {instructions}\n\
Each question must have 4 options with one correct answer. Format your response as a JSON object, where each question has:\n\
- question: string (the question text)\n\
- options: array of 4 strings (the answer choices)\n\
- correct_answer: number (0-3, the index of the correct answer)\n\
- explanation: string (brief explanation of why the answer is correct)\n\
\n\
Notes:\n\
{notes}\n\
\n\
Return ONLY valid JSON with exactly {n} questions in this format:\n\
{{\n\
  \"questions\": [\n\
    {{\n\
      \"question\": \"...\",\n\
      \"options\": [\"...\", \"...\", \"...\", \"...\"],\n\
      \"correct_answer\": 0,\n\
      \"explanation\": \"...\"\n\
    }}\n\
  ]\n\
}}\n\
\n\
Important: Return ONLY the JSON object, no markdown formatting, no code blocks, just the raw JSON.",
            difficulty = self.difficulty.label(),
            instructions = self.difficulty.instructions(),
            notes = self.source_text,
        )
    }
}
