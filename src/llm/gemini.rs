//! Gemini `generateContent` API client.
//!
//! Thin HTTP wrapper for `/models/{model}:generateContent`. Pure parsing in
//! `parse_response` for testability.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::LlmTimeouts;
use super::types::{GenerationConfig, LlmError, Message, Role};

/// Finish reasons for which the candidate text must not be shown.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "LANGUAGE"];

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeouts: LlmTimeouts) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }

    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        config: &GenerationConfig,
        history: &[Message],
    ) -> Result<String, LlmError> {
        let body = build_request(prompt, config, history);
        let url = format!("{}/models/{model}:generateContent", self.base_url);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        debug!(model, body_len = text.len(), "gemini: response received");
        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<WireContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct WireContent<'a> {
    role: Role,
    parts: Vec<WirePart<'a>>,
}

#[derive(Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// =============================================================================
// REQUEST BUILDING / PARSING
// =============================================================================

fn build_request<'a>(prompt: &'a str, config: &'a GenerationConfig, history: &'a [Message]) -> ApiRequest<'a> {
    let mut contents: Vec<WireContent<'a>> = history
        .iter()
        .map(|m| WireContent { role: m.role, parts: vec![WirePart { text: &m.text }] })
        .collect();
    contents.push(WireContent { role: Role::User, parts: vec![WirePart { text: prompt }] });
    ApiRequest { contents, generation_config: config }
}

fn parse_response(json: &str) -> Result<String, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        // Feedback without candidates means the prompt was refused, reason or not.
        return match api.prompt_feedback {
            Some(PromptFeedback { block_reason: Some(reason) }) => {
                Err(LlmError::Blocked(format!("prompt blocked ({reason})")))
            }
            Some(PromptFeedback { block_reason: None }) => Err(LlmError::Blocked("prompt blocked".into())),
            None => Ok(String::new()),
        };
    };

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|r| BLOCKING_FINISH_REASONS.contains(r))
    {
        return Err(LlmError::Blocked(format!("candidate finished with {reason}")));
    }

    Ok(candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
