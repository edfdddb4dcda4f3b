use async_trait::async_trait;

use crate::error::AiError;
use crate::generator::CompletionClient;

/// Mock client for testing that returns a fixed reply
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    reply: String,
}

impl MockClient {
    pub fn fixed(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl CompletionClient for MockClient {
    async fn ask_raw(&self, _prompt: String) -> Result<String, AiError> {
        Ok(self.reply.clone())
    }

    fn clone_box(&self) -> Box<dyn CompletionClient> {
        Box::new(self.clone())
    }
}

/// Mock client whose every request is rejected by the safety filter
#[derive(Debug, Clone)]
pub struct MockBlocked {
    pub reason: String,
}

impl MockBlocked {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl CompletionClient for MockBlocked {
    async fn ask_raw(&self, _prompt: String) -> Result<String, AiError> {
        Err(AiError::Blocked {
            reason: self.reason.clone(),
        })
    }

    fn clone_box(&self) -> Box<dyn CompletionClient> {
        Box::new(self.clone())
    }
}
