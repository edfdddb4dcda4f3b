use quizcraft::error::ValidationError;
use quizcraft::request::{
    clamp_question_count, clamp_time_limit_minutes, question_count_from_str, Difficulty,
    QuizRequest,
};

#[test]
fn question_count_clamps_into_range() {
    assert_eq!(clamp_question_count(0), 1);
    assert_eq!(clamp_question_count(-5), 1);
    assert_eq!(clamp_question_count(999), 20);
    assert_eq!(clamp_question_count(5), 5);
    assert_eq!(clamp_question_count(20), 20);
}

#[test]
fn non_numeric_count_defaults_then_clamps() {
    assert_eq!(question_count_from_str("abc"), 5);
    assert_eq!(question_count_from_str(""), 5);
    assert_eq!(question_count_from_str("0"), 1);
    assert_eq!(question_count_from_str("999"), 20);
    assert_eq!(question_count_from_str(" 7 "), 7);
}

#[test]
fn unrecognized_difficulty_falls_back_to_medium() {
    assert_eq!(Difficulty::parse_or_default("easy"), Difficulty::Easy);
    assert_eq!(Difficulty::parse_or_default("HARD"), Difficulty::Hard);
    assert_eq!(Difficulty::parse_or_default("medium"), Difficulty::Medium);
    assert_eq!(Difficulty::parse_or_default("brutal"), Difficulty::Medium);
    assert_eq!(Difficulty::parse_or_default(""), Difficulty::Medium);
}

#[test]
fn time_limit_clamps_up_to_one_minute() {
    assert_eq!(clamp_time_limit_minutes(0), 1);
    assert_eq!(clamp_time_limit_minutes(-3), 1);
    assert_eq!(clamp_time_limit_minutes(1), 1);
    assert_eq!(clamp_time_limit_minutes(45), 45);
}

#[test]
fn empty_notes_are_rejected() {
    assert_eq!(
        QuizRequest::new("", 5, Difficulty::Medium).unwrap_err(),
        ValidationError::EmptyNotes
    );
    assert_eq!(
        QuizRequest::new("   \n\t", 5, Difficulty::Medium).unwrap_err(),
        ValidationError::EmptyNotes
    );
}

#[test]
fn request_clamps_its_own_count() {
    let request = QuizRequest::new("photosynthesis notes", 0, Difficulty::Easy).unwrap();
    assert_eq!(request.question_count(), 1);
    let request = QuizRequest::new("photosynthesis notes", 500, Difficulty::Easy).unwrap();
    assert_eq!(request.question_count(), 20);
}

#[test]
fn notes_are_joined_with_blank_lines() {
    let request =
        QuizRequest::from_notes(["first note", "second note"], 5, Difficulty::Medium).unwrap();
    assert_eq!(request.source_text(), "first note\n\nsecond note");
}

#[test]
fn prompt_carries_count_difficulty_and_notes() {
    let request = QuizRequest::new("mitochondria are organelles", 7, Difficulty::Hard).unwrap();
    let prompt = request.build_prompt();

    assert!(prompt.contains("exactly 7 multiple choice questions"));
    assert!(prompt.contains("Difficulty: HARD"));
    assert!(prompt.contains(Difficulty::Hard.instructions()));
    assert!(prompt.contains("mitochondria are organelles"));
    assert!(prompt.contains("correct_answer"));
    assert!(prompt.contains("Return ONLY the JSON object"));
}
