use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;

use super::*;
use crate::types::Content;

fn test_client(base_url: String) -> Client {
    Client::new(ClientConfig::new("test-key").base_url(base_url)).unwrap()
}

#[test]
fn test_new_rejects_empty_api_key() {
    let err = Client::new(ClientConfig::default()).unwrap_err();
    assert!(matches!(err, GeminiError::Config(_)));
}

#[test]
fn test_model_url() {
    let client = Client::with_api_key("k").unwrap();
    assert_eq!(
        client.model_url("gemini-2.0-flash", "generateContent"),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
    );
}

#[test]
fn test_model_url_strips_models_prefix() {
    let client = Client::with_api_key("k").unwrap();
    assert_eq!(
        client.model_url("models/gemini-pro", "countTokens"),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:countTokens"
    );
}

#[test]
fn test_model_url_percent_encodes() {
    let client = Client::with_api_key("k").unwrap();
    assert_eq!(
        client.model_url("weird model", "generateContent"),
        "https://generativelanguage.googleapis.com/v1beta/models/weird%20model:generateContent"
    );
}

#[tokio::test]
async fn test_generate_content_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "2+2=?"}], "role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "4"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let request = GenerateContentRequest {
        contents: vec![Content::user("2+2=?")],
        generation_config: None,
        safety_settings: None,
    };
    let response = client
        .generate_content("gemini-2.0-flash", &request)
        .await
        .unwrap();
    assert_eq!(response.text().as_deref(), Some("4"));
}

#[tokio::test]
async fn test_generate_content_maps_error_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid",
                "status": "INVALID_ARGUMENT"
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let request = GenerateContentRequest {
        contents: vec![Content::user("hi")],
        generation_config: None,
        safety_settings: None,
    };
    let err = client
        .generate_content("gemini-2.0-flash", &request)
        .await
        .unwrap_err();
    match err {
        GeminiError::Api {
            code,
            message,
            status,
        } => {
            assert_eq!(code, 400);
            assert_eq!(message, "API key not valid");
            assert_eq!(status, "INVALID_ARGUMENT");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_body_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let err = client
        .count_tokens(
            "gemini-pro",
            &CountTokensRequest {
                contents: vec![Content::user("hi")],
            },
        )
        .await
        .unwrap_err();
    match err {
        GeminiError::Api {
            code,
            message,
            status,
        } => {
            assert_eq!(code, 503);
            assert_eq!(message, "upstream unavailable");
            assert_eq!(status, "UNKNOWN");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_count_tokens_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:countTokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 9})))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let response = client
        .count_tokens(
            "gemini-pro",
            &CountTokensRequest {
                contents: vec![Content::user("how many tokens")],
            },
        )
        .await
        .unwrap();
    assert_eq!(response.total_tokens, Some(9));
}

#[tokio::test]
async fn test_generate_content_stream_round_trip() {
    let sse_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Once\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" upon\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" a time\"}]},\"finishReason\":\"STOP\"}]}\n\n",
    );
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let request = GenerateContentRequest {
        contents: vec![Content::user("tell me a story")],
        generation_config: None,
        safety_settings: None,
    };
    let stream = client
        .generate_content_stream("gemini-2.0-flash", &request)
        .await
        .unwrap();
    let text = stream.collect_text().await.unwrap();
    assert_eq!(text, "Once upon a time");
}

#[tokio::test]
async fn test_stream_request_failure_surfaces_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}
        })))
        .mount(&server)
        .await;

    let client = test_client(server.uri());
    let request = GenerateContentRequest {
        contents: vec![Content::user("hi")],
        generation_config: None,
        safety_settings: None,
    };
    let err = client
        .generate_content_stream("gemini-2.0-flash", &request)
        .await
        .unwrap_err();
    assert!(matches!(err, GeminiError::Api { code: 429, .. }));
}
