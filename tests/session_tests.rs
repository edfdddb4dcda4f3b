use std::collections::HashMap;

use quizcraft::parser::QuizQuestion;
use quizcraft::score::{score, ScoreResult};
use quizcraft::session::{Phase, QuizSession, SessionError};

fn question(correct_index: usize) -> QuizQuestion {
    QuizQuestion {
        prompt: format!("question with answer {correct_index}"),
        options: [
            "option 0".to_string(),
            "option 1".to_string(),
            "option 2".to_string(),
            "option 3".to_string(),
        ],
        correct_index,
        explanation: "because".to_string(),
    }
}

fn active_session(correct: &[usize], duration_secs: u32) -> QuizSession {
    let mut session = QuizSession::new();
    let token = session.begin_generation().unwrap();
    let questions = correct.iter().map(|&c| question(c)).collect();
    assert!(session.complete_generation(token, questions, duration_secs));
    session
}

#[test]
fn new_session_starts_configuring() {
    let session = QuizSession::new();
    assert_eq!(session.phase(), Phase::Configuring);
    assert!(session.questions().is_empty());
}

#[test]
fn generation_lifecycle_reaches_active() {
    let session = active_session(&[0, 1], 120);
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.questions().len(), 2);
    assert_eq!(session.remaining_secs(), 120);
    assert_eq!(session.duration_secs(), 120);
}

#[test]
fn no_second_generation_while_one_is_in_flight() {
    let mut session = QuizSession::new();
    session.begin_generation().unwrap();
    assert_eq!(
        session.begin_generation().unwrap_err(),
        SessionError::GenerationInFlight
    );
}

#[test]
fn stale_generation_results_are_discarded() {
    let mut session = QuizSession::new();
    let first = session.begin_generation().unwrap();
    assert!(session.fail_generation(first));
    assert_eq!(session.phase(), Phase::Configuring);

    let second = session.begin_generation().unwrap();
    // The first request finally completes; it must be ignored.
    assert!(!session.complete_generation(first, vec![question(0)], 60));
    assert_eq!(session.phase(), Phase::Generating);
    assert!(session.questions().is_empty());

    // The latest request wins.
    assert!(session.complete_generation(second, vec![question(1)], 60));
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.questions().len(), 1);
}

#[test]
fn failed_generation_returns_to_configuring_with_no_state() {
    let mut session = QuizSession::new();
    let token = session.begin_generation().unwrap();
    assert!(session.fail_generation(token));
    assert_eq!(session.phase(), Phase::Configuring);
    assert!(session.questions().is_empty());
    assert!(session.selected_answers().is_empty());
    assert_eq!(session.remaining_secs(), 0);
}

#[test]
fn answers_only_recorded_while_active() {
    let mut session = QuizSession::new();
    assert_eq!(
        session.select_answer(0, 0).unwrap_err(),
        SessionError::NotActive
    );

    let mut session = active_session(&[0], 60);
    session.select_answer(0, 2).unwrap();
    session.check_answers().unwrap();
    assert_eq!(
        session.select_answer(0, 0).unwrap_err(),
        SessionError::NotActive
    );
}

#[test]
fn reanswering_overwrites_the_prior_selection() {
    let mut session = active_session(&[3], 60);
    session.select_answer(0, 1).unwrap();
    session.select_answer(0, 3).unwrap();
    assert_eq!(session.selected_answers().get(&0), Some(&3));
    assert_eq!(session.score(), ScoreResult { correct: 1, total: 1 });
}

#[test]
fn out_of_range_selections_are_rejected() {
    let mut session = active_session(&[0], 60);
    assert_eq!(
        session.select_answer(5, 0).unwrap_err(),
        SessionError::QuestionOutOfRange(5)
    );
    assert_eq!(
        session.select_answer(0, 4).unwrap_err(),
        SessionError::OptionOutOfRange(4)
    );
}

#[test]
fn check_answers_is_gated_on_full_coverage() {
    let mut session = active_session(&[0, 1, 2], 60);
    session.select_answer(0, 0).unwrap();
    assert_eq!(
        session.check_answers().unwrap_err(),
        SessionError::NotAllAnswered
    );
    assert_eq!(session.phase(), Phase::Active);

    session.select_answer(1, 1).unwrap();
    session.select_answer(2, 0).unwrap();
    let result = session.check_answers().unwrap();
    assert_eq!(result, ScoreResult { correct: 2, total: 3 });
    assert_eq!(session.phase(), Phase::Reviewing);
}

#[test]
fn countdown_expiry_times_out_then_reviews() {
    let mut session = active_session(&[0], 5);
    for expected in [4, 3, 2, 1] {
        session.tick();
        assert_eq!(session.remaining_secs(), expected);
        assert_eq!(session.phase(), Phase::Active);
    }
    assert_eq!(session.tick(), Phase::TimedOut);
    assert_eq!(session.remaining_secs(), 0);

    // The recurring ticker promotes a timed-out session into review.
    assert_eq!(session.tick(), Phase::Reviewing);
    assert_eq!(session.remaining_secs(), 0);

    // Further ticks change nothing and never go negative.
    assert_eq!(session.tick(), Phase::Reviewing);
    assert_eq!(session.remaining_secs(), 0);
}

#[test]
fn ticks_outside_active_are_noops() {
    let mut session = QuizSession::new();
    assert_eq!(session.tick(), Phase::Configuring);

    let mut session = active_session(&[0], 60);
    session.select_answer(0, 0).unwrap();
    session.check_answers().unwrap();
    assert_eq!(session.tick(), Phase::Reviewing);
    assert_eq!(session.remaining_secs(), 60);
}

#[test]
fn regeneration_resets_answers_timer_and_phase() {
    let mut session = active_session(&[0, 1], 60);
    session.select_answer(0, 0).unwrap();
    session.tick();

    let token = session.begin_generation().unwrap();
    assert_eq!(session.phase(), Phase::Generating);
    assert!(session.selected_answers().is_empty());
    assert!(session.questions().is_empty());
    assert_eq!(session.remaining_secs(), 0);

    assert!(session.complete_generation(token, vec![question(2)], 30));
    assert_eq!(session.remaining_secs(), 30);
}

#[test]
fn scoring_counts_matches_and_treats_unanswered_as_wrong() {
    // Correct indices [0,1,2,3,0]; selections [0,1,9,3,<unset>].
    let questions: Vec<QuizQuestion> = [0, 1, 2, 3, 0].iter().map(|&c| question(c)).collect();
    let selected = HashMap::from([(0, 0), (1, 1), (2, 9), (3, 3)]);
    assert_eq!(score(&questions, &selected), ScoreResult { correct: 3, total: 5 });
}

#[test]
fn scoring_is_idempotent_on_an_unchanged_session() {
    let mut session = active_session(&[0, 1, 2], 60);
    session.select_answer(0, 0).unwrap();
    session.select_answer(1, 2).unwrap();
    let first = session.score();
    let second = session.score();
    assert_eq!(first, second);
    assert_eq!(first, ScoreResult { correct: 1, total: 3 });
}

#[test]
fn record_matches_session_score() {
    let mut session = active_session(&[1, 2], 60);
    session.select_answer(0, 1).unwrap();
    session.select_answer(1, 0).unwrap();
    session.check_answers().unwrap();

    let record = session.record("biology-101");
    assert_eq!(record.class_id, "biology-101");
    assert_eq!(record.score, 1);
    assert_eq!(record.total_questions, 2);
    assert_eq!(record.questions.len(), 2);
    assert!(record.questions[0].correct);
    assert_eq!(record.questions[1].selected, Some(0));
    assert!(!record.questions[1].correct);
}
