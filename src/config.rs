use std::env;

use crate::error::AiError;

/// Trait for clients that read their API key from the environment.
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file
    fn find_key() -> Option<String> {
        // Load .env if present (silently fail if not found)
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME).ok().filter(|k| !k.trim().is_empty())
    }

    /// Like `find_key`, but missing credentials become a configuration error.
    /// Checked once at startup; no request is attempted without a key.
    fn require_key() -> Result<String, AiError> {
        Self::find_key().ok_or(AiError::MissingApiKey(Self::KEY_NAME))
    }
}
