//! Lifecycle of a single quiz attempt.
//!
//! The session is the one place with temporal logic: a countdown that ticks
//! once per second while the quiz is active and forces review when it
//! expires. All mutation happens through `&mut self` on one owner; the
//! driving event loop serializes ticks and answer selection.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::parser::QuizQuestion;
use crate::score::{score, QuizRecord, ScoreResult};

/// Lifecycle phase of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// User is choosing question count, difficulty and time limit.
    Configuring,
    /// A generation request is in flight. No second request may start.
    Generating,
    /// Questions are on screen, the countdown is running.
    Active,
    /// The countdown reached zero while active.
    TimedOut,
    /// Answers are revealed. Terminal for this attempt.
    Reviewing,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("answers can only be recorded while the quiz is active")]
    NotActive,
    #[error("question index {0} is out of range")]
    QuestionOutOfRange(usize),
    #[error("option index {0} is out of range")]
    OptionOutOfRange(usize),
    #[error("every question must be answered before checking")]
    NotAllAnswered,
    #[error("a generation request is already in flight")]
    GenerationInFlight,
}

/// Countdown service: one decrement per `tick()`, saturating at zero.
/// Independent of any clock source so it can be driven by a timer callback
/// in production and directly in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    /// Decrement by one second; returns the new remaining value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }
}

/// A single quiz attempt: the fixed question list, the partial answer map,
/// the countdown, and the current phase. The session exclusively owns its
/// questions and answers.
///
/// Stale generation results are fenced off with a monotonically incrementing
/// token: `begin_generation` returns the token for the request it starts,
/// and completions carrying an older token are discarded (latest wins).
#[derive(Debug)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    selected: HashMap<usize, usize>,
    duration_secs: u32,
    countdown: Countdown,
    phase: Phase,
    generation_token: u64,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            selected: HashMap::new(),
            duration_secs: 0,
            countdown: Countdown::default(),
            phase: Phase::Configuring,
            generation_token: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn selected_answers(&self) -> &HashMap<usize, usize> {
        &self.selected
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Start a new generation attempt. Rejected while one is already in
    /// flight; from any other phase it unconditionally discards the previous
    /// attempt's questions, answers and timer.
    pub fn begin_generation(&mut self) -> Result<u64, SessionError> {
        if self.phase() == Phase::Generating {
            return Err(SessionError::GenerationInFlight);
        }
        self.generation_token += 1;
        self.questions.clear();
        self.selected.clear();
        self.countdown = Countdown::default();
        self.duration_secs = 0;
        self.phase = Phase::Generating;
        info!(token = self.generation_token, "generation started");
        Ok(self.generation_token)
    }

    /// Seed the session with generated questions and start the countdown.
    /// Returns false (and changes nothing) if `token` is stale, i.e. a newer
    /// generation has been started since this one.
    pub fn complete_generation(
        &mut self,
        token: u64,
        questions: Vec<QuizQuestion>,
        duration_secs: u32,
    ) -> bool {
        if token != self.generation_token {
            warn!(token, current = self.generation_token, "discarding stale generation result");
            return false;
        }
        info!(count = questions.len(), duration_secs, "quiz ready");
        self.questions = questions;
        self.selected.clear();
        self.duration_secs = duration_secs;
        self.countdown = Countdown::new(duration_secs);
        self.phase = Phase::Active;
        true
    }

    /// Record a failed generation attempt: back to configuring with no
    /// partial quiz state. Stale failures are ignored like stale results.
    pub fn fail_generation(&mut self, token: u64) -> bool {
        if token != self.generation_token {
            return false;
        }
        self.questions.clear();
        self.selected.clear();
        self.countdown = Countdown::default();
        self.duration_secs = 0;
        self.phase = Phase::Configuring;
        true
    }

    /// Record an answer. Re-answering a question overwrites the prior
    /// selection. Only accepted while active.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), SessionError> {
        if self.phase() != Phase::Active {
            return Err(SessionError::NotActive);
        }
        if question >= self.questions.len() {
            return Err(SessionError::QuestionOutOfRange(question));
        }
        if option >= 4 {
            return Err(SessionError::OptionOutOfRange(option));
        }
        self.selected.insert(question, option);
        Ok(())
    }

    pub fn all_answered(&self) -> bool {
        (0..self.questions.len()).all(|i| self.selected.contains_key(&i))
    }

    /// Manual "check answers": gated on every question having a recorded
    /// answer. Enters review and returns the score.
    pub fn check_answers(&mut self) -> Result<ScoreResult, SessionError> {
        if self.phase() != Phase::Active {
            return Err(SessionError::NotActive);
        }
        if !self.all_answered() {
            return Err(SessionError::NotAllAnswered);
        }
        self.phase = Phase::Reviewing;
        Ok(self.score())
    }

    /// Advance the countdown by one second. Only mutates while active: at
    /// zero the session times out, and the next tick of the recurring timer
    /// promotes it into review automatically. Any other phase is a no-op.
    pub fn tick(&mut self) -> Phase {
        match self.phase() {
            Phase::Active => {
                let remaining = self.countdown.tick();
                debug!(remaining, "tick");
                if self.countdown.is_expired() {
                    info!("time is up");
                    self.phase = Phase::TimedOut;
                }
            }
            Phase::TimedOut => {
                self.phase = Phase::Reviewing;
            }
            _ => {}
        }
        self.phase()
    }

    /// Recompute the score from the current answers. Pure with respect to
    /// the session: calling it twice on an unchanged session yields the same
    /// result.
    pub fn score(&self) -> ScoreResult {
        score(&self.questions, &self.selected)
    }

    /// Build the persistence handoff record for this attempt.
    pub fn record(&self, class_id: &str) -> QuizRecord {
        QuizRecord::new(class_id, &self.questions, &self.selected)
    }
}
