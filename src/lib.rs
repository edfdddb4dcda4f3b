pub mod clients;
pub mod config;
pub mod error;
pub mod generator;
pub mod parser;
pub mod request;
pub mod score;
pub mod session;
pub mod tutor;

// Convenient re-exports
pub use error::{AiError, MalformedQuizDataError, QuizError, ValidationError};
pub use generator::{Attachment, CompletionClient, QuizGenerator};
pub use parser::{parse_quiz, QuizQuestion};
pub use request::{Difficulty, QuizRequest};
pub use score::{score, QuizRecord, ScoreResult};
pub use session::{Countdown, Phase, QuizSession, SessionError};
