use super::*;

fn make_response(parts: serde_json::Value, finish_reason: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": finish_reason,
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 4, "candidatesTokenCount": 12, "totalTokenCount": 16 },
        "modelVersion": "gemini-1.5-flash"
    })
    .to_string()
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([{ "text": "Here is a summary..." }]), "STOP");
    assert_eq!(parse_response(&json).unwrap(), "Here is a summary...");
}

#[test]
fn parse_concatenates_parts() {
    let json = make_response(serde_json::json!([{ "text": "Hello, " }, { "text": "world" }]), "STOP");
    assert_eq!(parse_response(&json).unwrap(), "Hello, world");
}

#[test]
fn parse_max_tokens_keeps_partial_text() {
    let json = make_response(serde_json::json!([{ "text": "cut of" }]), "MAX_TOKENS");
    assert_eq!(parse_response(&json).unwrap(), "cut of");
}

#[test]
fn parse_safety_finish_is_blocked() {
    let json = make_response(serde_json::json!([]), "SAFETY");
    let err = parse_response(&json).unwrap_err();
    assert!(matches!(&err, LlmError::Blocked(msg) if msg.contains("SAFETY")));
}

#[test]
fn parse_prompt_feedback_block() {
    let json = serde_json::json!({
        "promptFeedback": { "blockReason": "PROHIBITED_CONTENT" }
    })
    .to_string();
    let err = parse_response(&json).unwrap_err();
    assert!(matches!(&err, LlmError::Blocked(msg) if msg.contains("PROHIBITED_CONTENT")));
}

#[test]
fn parse_prompt_feedback_without_reason_is_blocked() {
    let json = serde_json::json!({
        "candidates": [],
        "promptFeedback": { "safetyRatings": [] }
    })
    .to_string();
    let err = parse_response(&json).unwrap_err();
    assert!(matches!(&err, LlmError::Blocked(msg) if msg == "prompt blocked"));
}

#[test]
fn parse_no_candidates_is_empty_text() {
    let json = serde_json::json!({ "candidates": [] }).to_string();
    assert_eq!(parse_response(&json).unwrap(), "");
}

#[test]
fn parse_invalid_json() {
    let err = parse_response("not json").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn request_body_matches_wire_format() {
    let body = build_request("summarize this paragraph", &GenerationConfig::FIXED, &[]);
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(
        value["contents"],
        serde_json::json!([{ "role": "user", "parts": [{ "text": "summarize this paragraph" }] }])
    );
    let cfg = &value["generationConfig"];
    assert_eq!(cfg["topK"], 64);
    assert_eq!(cfg["maxOutputTokens"], 8192);
    assert_eq!(cfg["responseMimeType"], "text/plain");
}

#[test]
fn request_body_prepends_history() {
    let history = vec![
        Message { role: Role::User, text: "hi".into() },
        Message { role: Role::Model, text: "hello".into() },
    ];
    let body = build_request("again", &GenerationConfig::FIXED, &history);
    let value = serde_json::to_value(&body).unwrap();
    let contents = value["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "again");
}
