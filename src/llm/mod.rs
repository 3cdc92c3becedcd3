//! LLM — adapter to the hosted text-generation service.
//!
//! DESIGN
//! ======
//! Configured entirely from environment variables. `LlmClient` owns the
//! provider HTTP client plus the model name and implements
//! [`GenerationClient`], which is the only surface the request controller
//! depends on.

pub mod config;
pub mod gemini;
pub mod types;

use config::LlmConfig;
pub use types::{GenerationClient, GenerationConfig, LlmError, Message};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete generation client backed by the Gemini API.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: gemini::GeminiClient,
    model: String,
}

impl LlmClient {
    /// Build an LLM client from environment variables.
    ///
    /// - `LLM_API_KEY_ENV`: name of env var holding the API key (default `GEMINI_API_KEY`)
    /// - `LLM_MODEL`: model name (default `gemini-1.5-flash`)
    /// - `LLM_BASE_URL`: custom base URL for the Gemini API
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = gemini::GeminiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model })
    }

    /// Return the configured model name (e.g. `"gemini-1.5-flash"`).
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl GenerationClient for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
        history: &[Message],
    ) -> Result<String, LlmError> {
        self.inner
            .generate(&self.model, prompt, config, history)
            .await
    }
}
