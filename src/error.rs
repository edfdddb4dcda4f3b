use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("AI error: {0}")]
    Ai(#[from] AiError),
    #[error("failed to parse quiz data, please try again: {0}")]
    MalformedQuizData(#[from] MalformedQuizDataError),
}

/// Bad user input, caught before any request is sent.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Notes are required")]
    EmptyNotes,
    #[error("Message is required")]
    EmptyMessage,
}

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key is not configured: set {0}")]
    MissingApiKey(&'static str),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limit exceeded")]
    RateLimit,
    #[error("Authentication failed")]
    Authentication,
    #[error("Request blocked by content safety filters: {reason}")]
    Blocked { reason: String },
    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// The model reply could not be turned into valid quiz structure. Nothing is
/// salvaged from a reply that trips any of these; the whole attempt is
/// discarded.
#[derive(Error, Debug)]
pub enum MalformedQuizDataError {
    #[error("no JSON object found in model response")]
    NoJsonFound,
    #[error("JSON deserialization error: {0}. Raw response: {1}")]
    JsonDeserialization(#[source] serde_json::Error, String),
    #[error("response contains no questions")]
    NoQuestions,
    #[error("question {index}: question text is empty")]
    EmptyPrompt { index: usize },
    #[error("question {index}: expected exactly 4 options, got {found}")]
    WrongOptionCount { index: usize, found: usize },
    #[error("question {index}: correct_answer {value} is out of range 0-3")]
    CorrectIndexOutOfRange { index: usize, value: i64 },
}
