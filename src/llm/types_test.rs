use super::*;

// =============================================================================
// GenerationConfig
// =============================================================================

#[test]
fn fixed_config_values() {
    let cfg = GenerationConfig::FIXED;
    assert!((cfg.temperature - 1.0).abs() < f32::EPSILON);
    assert!((cfg.top_p - 0.95).abs() < f32::EPSILON);
    assert_eq!(cfg.top_k, 64);
    assert_eq!(cfg.max_output_tokens, 8192);
    assert_eq!(cfg.response_format, ResponseFormat::PlainText);
}

#[test]
fn default_is_fixed() {
    assert_eq!(GenerationConfig::default(), GenerationConfig::FIXED);
}

#[test]
fn config_serializes_to_wire_names() {
    let value = serde_json::to_value(GenerationConfig::FIXED).unwrap();
    assert_eq!(value["temperature"], 1.0);
    assert_eq!(value["topK"], 64);
    assert_eq!(value["maxOutputTokens"], 8192);
    assert_eq!(value["responseMimeType"], "text/plain");
    assert!(value["topP"].as_f64().is_some_and(|p| (p - 0.95).abs() < 1e-6));
    assert!(value.get("top_p").is_none());
}

// =============================================================================
// Message
// =============================================================================

#[test]
fn role_serializes_lowercase() {
    let msg = Message { role: Role::Model, text: "hi".into() };
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(value["role"], "model");
}

// =============================================================================
// LlmError display
// =============================================================================

#[test]
fn api_response_display_uses_provider_message() {
    let err = LlmError::ApiResponse {
        status: 429,
        body: r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#.into(),
    };
    assert_eq!(err.to_string(), "API response error: status 429: quota exceeded");
}

#[test]
fn api_response_display_truncates_raw_body() {
    let err = LlmError::ApiResponse { status: 502, body: "x".repeat(500) };
    let shown = err.to_string();
    assert!(shown.starts_with("API response error: status 502: "));
    assert_eq!(shown.matches('x').count(), BODY_SUMMARY_LIMIT);
}

#[test]
fn missing_api_key_display_names_var() {
    let err = LlmError::MissingApiKey { var: "GEMINI_API_KEY".into() };
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}
