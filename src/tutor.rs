//! Conversational AI tutor: the same completion client, a different prompt.
//! The transcript is replayed as a `Student:`/`Tutor:` dialog ahead of the
//! new message.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{QuizError, ValidationError};
use crate::generator::CompletionClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Tutor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorMessage {
    pub role: Role,
    pub content: String,
}

impl TutorMessage {
    pub fn student(content: impl Into<String>) -> Self {
        Self {
            role: Role::Student,
            content: content.into(),
        }
    }

    pub fn tutor(content: impl Into<String>) -> Self {
        Self {
            role: Role::Tutor,
            content: content.into(),
        }
    }
}

/// Assemble the tutor preamble, the prior conversation, and the new message
/// into a single prompt.
pub fn build_tutor_prompt(history: &[TutorMessage], message: &str) -> String {
    let mut context = String::from(
        "You are a helpful, patient, and knowledgeable AI tutor. Your role is to:\n\
- Explain concepts clearly and simply\n\
- Break down complex topics into understandable parts\n\
- Provide examples and analogies when helpful\n\
- Ask clarifying questions if needed\n\
- Encourage learning and critical thinking\n\
- Be supportive and encouraging\n\n",
    );

    if !history.is_empty() {
        context.push_str("Previous conversation:\n");
        for msg in history {
            let speaker = match msg.role {
                Role::Student => "Student",
                Role::Tutor => "Tutor",
            };
            context.push_str(&format!("{}: {}\n", speaker, msg.content));
        }
        context.push('\n');
    }

    context.push_str(&format!("Student: {}\nTutor:", message));
    context
}

/// Tutor frontend over a CompletionClient.
#[derive(Clone)]
pub struct Tutor<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> Tutor<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Ask the tutor a question in the context of the given conversation.
    #[instrument(target = "quizcraft::tutor", skip(self, history, message),
                 fields(history_len = history.len(), message_len = message.len()))]
    pub async fn ask(
        &self,
        history: &[TutorMessage],
        message: &str,
    ) -> Result<String, QuizError> {
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }

        let prompt = build_tutor_prompt(history, message);
        let reply = self.client.ask_raw(prompt).await?;
        info!(reply_len = reply.len(), "Tutor reply received");
        Ok(reply)
    }
}
