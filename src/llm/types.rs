//! LLM types — generation parameters, history messages, and errors.
//!
//! Provider-neutral types shared by the Gemini client and the request
//! controller. The controller only ever sees [`GenerationClient`] and
//! [`LlmError`]; wire shapes stay in the provider module.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
///
/// Every failure of a generation call (network, auth, quota, content policy,
/// malformed body) lands in one of these variants. Callers that only need to
/// know "the call failed" treat the whole enum as a single failure kind.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required API key environment variable is not set.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {}: {}", .status, summarize_body(.body))]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The provider refused the prompt or the candidate (safety / policy block).
    #[error("content blocked: {0}")]
    Blocked(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The generation task panicked or was cancelled before producing an outcome.
    #[error("generation ended without a result")]
    Interrupted,
}

const BODY_SUMMARY_LIMIT: usize = 200;

/// Pull the provider's `error.message` out of a JSON error body when present,
/// otherwise fall back to a truncated copy of the raw body.
fn summarize_body(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_owned));
    match message {
        Some(m) => m,
        None => body.trim().chars().take(BODY_SUMMARY_LIMIT).collect(),
    }
}

// =============================================================================
// GENERATION CONFIG
// =============================================================================

/// Format the provider is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    #[serde(rename = "text/plain")]
    PlainText,
}

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    pub response_format: ResponseFormat,
}

impl GenerationConfig {
    /// The fixed parameter set every request is sent with.
    pub const FIXED: Self = Self {
        temperature: 1.0,
        top_p: 0.95,
        top_k: 64,
        max_output_tokens: 8192,
        response_format: ResponseFormat::PlainText,
    };
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::FIXED
    }
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// Who authored a history message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single prior turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

// =============================================================================
// GENERATION CLIENT TRAIT
// =============================================================================

/// Provider-neutral async trait for text generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text for `prompt`, continuing `history`.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider rejects it,
    /// or the response is malformed.
    async fn generate(&self, prompt: &str, config: &GenerationConfig, history: &[Message])
    -> Result<String, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
