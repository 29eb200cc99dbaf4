use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::*;
use crate::config::ClientConfig;
use crate::types::HarmBlockThreshold;
use crate::types::HarmCategory;

fn test_model(base_url: String) -> GenerativeModel {
    let client = Client::new(ClientConfig::new("test-key").base_url(base_url)).unwrap();
    GenerativeModel::new(client, "gemini-2.0-flash")
}

#[test]
fn test_model_name() {
    let client = Client::with_api_key("k").unwrap();
    let model = GenerativeModel::new(client, "gemini-pro");
    assert_eq!(model.name(), "gemini-pro");
}

#[tokio::test]
async fn test_request_carries_config_and_safety_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "hi"}], "role": "user"}],
            "generationConfig": {"temperature": 0.25, "maxOutputTokens": 64},
            "safetySettings": [{
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "threshold": "BLOCK_ONLY_HIGH"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "hello"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = test_model(server.uri())
        .with_generation_config(GenerationConfig {
            temperature: Some(0.25),
            max_output_tokens: Some(64),
            ..Default::default()
        })
        .with_safety_settings(vec![SafetySetting::new(
            HarmCategory::HarmCategoryDangerousContent,
            HarmBlockThreshold::BlockOnlyHigh,
        )]);

    let response = model
        .generate_content(vec![Content::user("hi")])
        .await
        .unwrap();
    assert_eq!(response.text().as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_count_tokens_extracts_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 17})))
        .mount(&server)
        .await;

    let model = test_model(server.uri());
    let count = model.count_tokens(vec![Content::user("hi")]).await.unwrap();
    assert_eq!(count, 17);
}

#[tokio::test]
async fn test_count_tokens_defaults_to_zero_when_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let model = test_model(server.uri());
    let count = model.count_tokens(vec![Content::user("hi")]).await.unwrap();
    assert_eq!(count, 0);
}
