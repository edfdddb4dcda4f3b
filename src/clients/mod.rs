pub mod gemini;
pub mod mock;

pub use gemini::{GeminiClient, GeminiConfig, GeminiModels};
pub use mock::{MockBlocked, MockClient};
