use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::QuizQuestion;

/// Correctness count over a quiz attempt. Derived on demand from the session;
/// never stored independently of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub correct: usize,
    pub total: usize,
}

/// Count questions whose selected option matches the answer key. Unanswered
/// questions count as incorrect. Pure and total-defined.
pub fn score(questions: &[QuizQuestion], selected: &HashMap<usize, usize>) -> ScoreResult {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, q)| selected.get(i) == Some(&q.correct_index))
        .count();
    ScoreResult {
        correct,
        total: questions.len(),
    }
}

/// Per-question review detail included in the persistence handoff.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionReview {
    pub question: String,
    pub options: [String; 4],
    pub selected: Option<usize>,
    pub correct_answer: usize,
    pub correct: bool,
    pub explanation: String,
}

/// Result record emitted after review for the external storage collaborator.
/// The storage schema beyond this shape is not ours.
#[derive(Debug, Clone, Serialize)]
pub struct QuizRecord {
    pub class_id: String,
    pub score: usize,
    pub total_questions: usize,
    pub questions: Vec<QuestionReview>,
    pub completed_at: DateTime<Utc>,
}

impl QuizRecord {
    pub fn new(
        class_id: impl Into<String>,
        questions: &[QuizQuestion],
        selected: &HashMap<usize, usize>,
    ) -> Self {
        let result = score(questions, selected);
        let questions = questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let picked = selected.get(&i).copied();
                QuestionReview {
                    question: q.prompt.clone(),
                    options: q.options.clone(),
                    selected: picked,
                    correct_answer: q.correct_index,
                    correct: picked == Some(q.correct_index),
                    explanation: q.explanation.clone(),
                }
            })
            .collect();
        Self {
            class_id: class_id.into(),
            score: result.correct,
            total_questions: result.total,
            questions,
            completed_at: Utc::now(),
        }
    }
}
