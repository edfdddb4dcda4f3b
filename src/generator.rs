//! Generation pipeline: wraps a low-level completion client with prompt
//! assembly and strict quiz parsing.
//!
//! One attempt per call, no retry: a provider failure or an unparsable reply
//! propagates immediately and the caller surfaces it as a single generation
//! failure.

use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{info, instrument};

use crate::error::{AiError, QuizError};
use crate::parser::{parse_quiz, QuizQuestion};
use crate::request::QuizRequest;

/// Inline binary context for a generation request, e.g. an image or an
/// extracted PDF page. `data` is base64-encoded.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }
}

/// Low-level completion client abstraction.
///
/// Implementors provide `ask_raw`, which executes a prompt and returns the
/// raw model text. Prompt assembly and reply parsing live in `QuizGenerator`.
/// This is the single point where external latency and failure is absorbed.
#[async_trait]
pub trait CompletionClient: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn ask_raw(&self, prompt: String) -> Result<String, AiError>;

    /// Clone this client into a boxed trait object
    fn clone_box(&self) -> Box<dyn CompletionClient>;

    /// Optional: execute a prompt with auxiliary attachments. The default
    /// ignores them; multimodal providers override.
    async fn ask_with_attachments(
        &self,
        prompt: String,
        _attachments: &[Attachment],
    ) -> Result<String, AiError> {
        self.ask_raw(prompt).await
    }
}

impl Clone for Box<dyn CompletionClient> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl CompletionClient for Box<dyn CompletionClient> {
    async fn ask_raw(&self, prompt: String) -> Result<String, AiError> {
        self.as_ref().ask_raw(prompt).await
    }

    fn clone_box(&self) -> Box<dyn CompletionClient> {
        self.as_ref().clone_box()
    }

    async fn ask_with_attachments(
        &self,
        prompt: String,
        attachments: &[Attachment],
    ) -> Result<String, AiError> {
        self.as_ref().ask_with_attachments(prompt, attachments).await
    }
}

/// Quiz generator that wraps a CompletionClient. Generic so callers can pick
/// a concrete client or `Box<dyn CompletionClient>` for dynamic dispatch.
#[derive(Clone)]
pub struct QuizGenerator<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> QuizGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one generation attempt: build the instruction payload, execute it,
    /// and parse the reply into validated questions.
    #[instrument(target = "quizcraft::generator", skip(self, request),
                 fields(question_count = request.question_count(), difficulty = %request.difficulty()))]
    pub async fn generate(&self, request: &QuizRequest) -> Result<Vec<QuizQuestion>, QuizError> {
        self.generate_with_attachments(request, &[]).await
    }

    /// Like `generate`, but carries auxiliary document/image context.
    #[instrument(target = "quizcraft::generator", skip(self, request, attachments),
                 fields(question_count = request.question_count(), attachment_count = attachments.len()))]
    pub async fn generate_with_attachments(
        &self,
        request: &QuizRequest,
        attachments: &[Attachment],
    ) -> Result<Vec<QuizQuestion>, QuizError> {
        info!(question_count = request.question_count(), "Starting quiz generation");

        let prompt = request.build_prompt();
        let raw = self.client.ask_with_attachments(prompt, attachments).await?;
        if raw.trim().is_empty() {
            return Err(AiError::EmptyResponse.into());
        }

        let questions = parse_quiz(&raw)?;
        info!(count = questions.len(), "Quiz generation completed");
        Ok(questions)
    }
}
