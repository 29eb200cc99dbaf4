use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn test_safety_setting_serializes_screaming_snake() {
    let setting = SafetySetting::new(
        HarmCategory::HarmCategoryHarassment,
        HarmBlockThreshold::BlockLowAndAbove,
    );
    let value = serde_json::to_value(&setting).unwrap();
    assert_eq!(
        value,
        json!({
            "category": "HARM_CATEGORY_HARASSMENT",
            "threshold": "BLOCK_LOW_AND_ABOVE",
        })
    );
}

#[test]
fn test_blob_from_bytes_encodes_base64() {
    let blob = Blob::from_bytes(b"hello", "image/png");
    assert_eq!(blob.data.as_deref(), Some("aGVsbG8="));
    assert_eq!(blob.mime_type.as_deref(), Some("image/png"));
}

#[test]
fn test_part_constructors() {
    let text = Part::text("hi");
    assert_eq!(text.text.as_deref(), Some("hi"));
    assert!(text.inline_data.is_none());

    let blob = Part::from_bytes(&[1, 2, 3], "image/jpeg");
    assert!(blob.text.is_none());
    assert_eq!(
        blob.inline_data.as_ref().and_then(|b| b.mime_type.as_deref()),
        Some("image/jpeg")
    );
}

#[test]
fn test_content_roles() {
    assert_eq!(Content::user("q").role.as_deref(), Some("user"));
    assert_eq!(Content::model("a").role.as_deref(), Some("model"));
}

#[test]
fn test_request_serialization_skips_absent_fields() {
    let request = GenerateContentRequest {
        contents: vec![Content::user("2+2=?")],
        generation_config: None,
        safety_settings: None,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "contents": [
                {"role": "user", "parts": [{"text": "2+2=?"}]}
            ]
        })
    );
}

#[test]
fn test_generation_config_camel_case() {
    let config = GenerationConfig {
        temperature: Some(0.5),
        top_p: Some(0.9),
        top_k: Some(40),
        max_output_tokens: Some(256),
        stop_sequences: Some(vec!["END".to_string()]),
    };
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(
        value,
        json!({
            "temperature": 0.5,
            "topP": 0.9,
            "topK": 40,
            "maxOutputTokens": 256,
            "stopSequences": ["END"],
        })
    );
}

#[test]
fn test_response_text_concatenates_parts() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": "Hello"}, {"text": " world"}]
            },
            "finishReason": "STOP"
        }]
    }))
    .unwrap();
    assert_eq!(response.text().as_deref(), Some("Hello world"));
    assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
}

#[test]
fn test_response_text_none_without_candidates() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "promptFeedback": {"blockReason": "SAFETY"}
    }))
    .unwrap();
    assert_eq!(response.text(), None);
    assert_eq!(response.block_reason(), Some(BlockedReason::Safety));
}

#[test]
fn test_response_ignores_unknown_fields() {
    let response: GenerateContentResponse = serde_json::from_value(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "ok"}]},
            "groundingMetadata": {"webSearchQueries": ["x"]}
        }],
        "usageMetadata": {"promptTokenCount": 3, "totalTokenCount": 7},
        "modelVersion": "gemini-2.0-flash"
    }))
    .unwrap();
    assert_eq!(response.text().as_deref(), Some("ok"));
    assert_eq!(
        response.usage_metadata.and_then(|u| u.total_token_count),
        Some(7)
    );
}

#[test]
fn test_count_tokens_response() {
    let response: CountTokensResponse =
        serde_json::from_value(json!({"totalTokens": 42})).unwrap();
    assert_eq!(response.total_tokens, Some(42));
}

#[test]
fn test_error_envelope_parses() {
    let parsed: ErrorResponse = serde_json::from_value(json!({
        "error": {
            "code": 429,
            "message": "Resource has been exhausted",
            "status": "RESOURCE_EXHAUSTED"
        }
    }))
    .unwrap();
    assert_eq!(parsed.error.code, 429);
    assert_eq!(parsed.error.status, "RESOURCE_EXHAUSTED");
}
