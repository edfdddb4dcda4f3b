pub mod config;
pub mod models;

pub use config::*;
pub use models::*;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::config::KeyFromEnv;
use crate::error::AiError;
use crate::generator::{Attachment, CompletionClient};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl KeyFromEnv for GeminiClient {
    const KEY_NAME: &'static str = "GEMINI_API_KEY";
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        info!(model = %config.model, "Creating new Gemini client");
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Build a client from the environment, failing fast if no credential is
    /// configured. No request is ever attempted without a key.
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = Self::require_key()?;
        Ok(Self::new(GeminiConfig {
            api_key,
            ..GeminiConfig::default()
        }))
    }

    async fn call_api(&self, parts: Vec<Part>) -> Result<String, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(self.config.generation()),
        };

        debug!(model = %self.config.model, "Sending request to Gemini API");
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            BASE_URL, self.config.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                AiError::Http(e.to_string())
            })?;

        debug!(status = %response.status(), "Received response from Gemini API");

        if response.status() == 429 {
            warn!("Gemini API rate limit exceeded");
            return Err(AiError::RateLimit);
        }

        if response.status() == 401 || response.status() == 403 {
            error!("Gemini API authentication failed");
            return Err(AiError::Authentication);
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Gemini API error");
            return Err(AiError::Api(error_text));
        }

        let gemini_response: GenerateContentResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response JSON");
            AiError::Http(e.to_string())
        })?;

        // Safety blocks are surfaced distinguishably, with the reason.
        if let Some(feedback) = &gemini_response.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                warn!(reason = %reason, "Gemini blocked the prompt");
                return Err(AiError::Blocked {
                    reason: reason.clone(),
                });
            }
        }

        let candidate = gemini_response.candidates.first().ok_or_else(|| {
            error!("No candidates in Gemini response");
            AiError::Api("No candidates in response".to_string())
        })?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            warn!("Gemini candidate was stopped for safety");
            return Err(AiError::Blocked {
                reason: "SAFETY".to_string(),
            });
        }

        let text = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.clone())
            .ok_or_else(|| {
                error!("No content in Gemini candidate");
                AiError::Api("No content in response".to_string())
            })?;

        if text.trim().is_empty() {
            warn!("Gemini returned blank text");
            return Err(AiError::EmptyResponse);
        }

        info!(response_len = text.len(), "Successfully received Gemini response");
        Ok(text)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AiError> {
        self.call_api(vec![Part::text(prompt)]).await
    }

    fn clone_box(&self) -> Box<dyn CompletionClient> {
        Box::new(self.clone())
    }

    #[instrument(skip(self, prompt, attachments),
                 fields(prompt_len = prompt.len(), attachment_count = attachments.len()))]
    async fn ask_with_attachments(
        &self,
        prompt: String,
        attachments: &[Attachment],
    ) -> Result<String, AiError> {
        // Attachments ride ahead of the instruction text, as inline parts.
        let mut parts: Vec<Part> = attachments
            .iter()
            .map(|a| Part::inline(a.mime_type.clone(), a.data.clone()))
            .collect();
        parts.push(Part::text(prompt));
        self.call_api(parts).await
    }
}
