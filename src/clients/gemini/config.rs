use crate::config::KeyFromEnv;

use super::models::{GeminiModels, GenerationConfig};

#[allow(clippy::module_name_repetitions)]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl KeyFromEnv for GeminiConfig {
    const KEY_NAME: &'static str = "GEMINI_API_KEY";
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: Self::find_key().unwrap_or_default(),
            model: GeminiModels::FLASH_2_5.to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
        }
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }
}
