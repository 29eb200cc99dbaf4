use std::collections::BTreeMap;
use std::fs;

use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::*;
use crate::content::HistoryPart;
use crate::stream::CollectChunks;

fn test_bridge(base_url: String) -> GeminiX {
    GeminiX::with_config(GeminiXConfig {
        base_url: Some(base_url),
    })
}

async fn init_test_model(bridge: &GeminiX) {
    bridge
        .init_model(ModelParams::new("gemini-2.0-flash", "test-key"))
        .await
        .unwrap();
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

#[tokio::test]
async fn test_operations_without_model_error() {
    let bridge = GeminiX::new();

    let err = bridge.send_message("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ModelNotInitialized));
    assert_eq!(err.to_string(), "Model not initialized");

    let err = bridge.count_tokens("hi", &[]).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ModelNotInitialized));

    let err = bridge.init_chat(Vec::new()).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ModelNotInitialized));
}

#[tokio::test]
async fn test_chat_operations_without_chat_error() {
    let bridge = GeminiX::new();
    init_test_model(&bridge).await;

    let err = bridge.send_chat_message("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ChatNotInitialized));
    assert_eq!(err.to_string(), "Chat not initialized");

    let err = bridge.count_chat_tokens(None, &[]).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ChatNotInitialized));

    let err = bridge.get_chat_history().await.unwrap_err();
    assert!(matches!(err, GeminiXError::ChatNotInitialized));
}

#[tokio::test]
async fn test_reinit_model_invalidates_chat() {
    let bridge = GeminiX::new();
    bridge
        .init_model(ModelParams::new("gemini-pro", "test-key"))
        .await
        .unwrap();
    bridge.init_chat(Vec::new()).await.unwrap();
    assert!(bridge.get_chat_history().await.is_ok());

    init_test_model(&bridge).await;

    let err = bridge.get_chat_history().await.unwrap_err();
    assert!(matches!(err, GeminiXError::ChatNotInitialized));
}

#[tokio::test]
async fn test_init_model_rejects_unknown_safety_category() {
    let bridge = GeminiX::new();
    let mut params = ModelParams::new("gemini-pro", "test-key");
    params.safety_settings = Some(BTreeMap::from([(
        "DEROGATORY".to_string(),
        "NONE".to_string(),
    )]));

    let err = bridge.init_model(params).await.unwrap_err();

    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
    assert_eq!(
        err.to_string(),
        "invalid argument: DEROGATORY is not a valid harm category"
    );

    // The failed init must not have installed anything.
    let err = bridge.send_message("hi", &[], None).await.unwrap_err();
    assert!(matches!(err, GeminiXError::ModelNotInitialized));
}

#[tokio::test]
async fn test_plain_question_resolves_without_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "2 + 2 = ?"}], "role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("4")))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    bridge
        .init_model(ModelParams::new("gemini-pro", "test-key"))
        .await
        .unwrap();

    let response = bridge.send_message("2 + 2 = ?", &[], None).await.unwrap();

    assert_eq!(response, "4");
}

#[tokio::test]
async fn test_send_message_streams_chunks_then_returns_accumulation() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"2 + 2 \"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"= 4\"}]}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;

    let mut sink = CollectChunks::new();
    let response = bridge
        .send_message("2 + 2 = ?", &[], Some(&mut sink))
        .await
        .unwrap();

    assert_eq!(response, "2 + 2 = 4");
    assert_eq!(sink.chunks, vec!["2 + 2 ", "= 4"]);
    assert_eq!(sink.flags, vec![false, false]);
    assert_eq!(sink.concatenated(), response);
}

#[tokio::test]
async fn test_send_message_inlines_resolved_image() {
    let dir = TempDir::new().unwrap();
    let path_on_disk = dir.path().join("pixel.png");
    let image_bytes: &[u8] = b"\x89PNG\r\n\x1a\nfixture";
    fs::write(&path_on_disk, image_bytes).unwrap();
    let encoded = base64::engine::general_purpose::STANDARD.encode(image_bytes);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "contents": [{
                "parts": [
                    {"text": "what is this?"},
                    {"inlineData": {"data": encoded, "mimeType": "image/png"}}
                ],
                "role": "user"
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("a fixture")))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;

    let images = vec![ImageReference::new(path_on_disk.to_string_lossy())];
    let response = bridge
        .send_message("what is this?", &images, None)
        .await
        .unwrap();

    assert_eq!(response, "a fixture");
}

#[tokio::test]
async fn test_unreadable_image_sends_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
        .expect(0)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;

    let err = bridge
        .send_message("look", &[ImageReference::new("/nonexistent/cat.png")], None)
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiXError::ImageResolution { .. }));
}

#[tokio::test]
async fn test_blocked_response_surfaces_block_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;

    let err = bridge.send_message("hi", &[], None).await.unwrap_err();

    assert!(matches!(err, GeminiXError::Vendor(GeminiError::Blocked(_))));
    assert_eq!(err.to_string(), "response blocked: SAFETY");
}

#[tokio::test]
async fn test_init_model_applies_generation_and_safety_settings() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "generationConfig": {"temperature": 0.25, "topK": 16},
            "safetySettings": [
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    let mut params = ModelParams::new("gemini-2.0-flash", "test-key");
    params.temperature = Some(0.25);
    params.top_k = Some(16);
    params.safety_settings = Some(BTreeMap::from([(
        "DANGEROUS_CONTENT".to_string(),
        "ONLY_HIGH".to_string(),
    )]));
    bridge.init_model(params).await.unwrap();

    assert_eq!(bridge.send_message("hi", &[], None).await.unwrap(), "ok");
}

#[tokio::test]
async fn test_count_tokens_returns_total() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "how many tokens?"}], "role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;

    let count = bridge.count_tokens("how many tokens?", &[]).await.unwrap();
    assert_eq!(count, 7);
}

#[tokio::test]
async fn test_seeded_history_precedes_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(body_partial_json(json!({
            "contents": [
                {"parts": [{"text": "hello"}], "role": "user"},
                {"parts": [{"text": "how are you?"}], "role": "user"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("doing well")))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;
    bridge
        .init_chat(vec![ChatHistoryItem::text(true, "hello")])
        .await
        .unwrap();

    let response = bridge
        .send_chat_message("how are you?", &[], None)
        .await
        .unwrap();
    assert_eq!(response, "doing well");

    let history = bridge.get_chat_history().await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(
        history[0],
        HistoryEntry {
            is_user: true,
            parts: vec![HistoryPart::Text("hello".to_string())],
        }
    );
    assert!(history[1].is_user);
    assert!(!history[2].is_user);
    assert_eq!(
        history[2].parts,
        vec![HistoryPart::Text("doing well".to_string())]
    );
}

#[tokio::test]
async fn test_streaming_chat_records_completed_exchange() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"par\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"tial\"}]}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:streamGenerateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;
    bridge.init_chat(Vec::new()).await.unwrap();

    let mut sink = CollectChunks::new();
    let response = bridge
        .send_chat_message("hi", &[], Some(&mut sink))
        .await
        .unwrap();

    assert_eq!(response, "partial");
    assert_eq!(sink.flags, vec![true, true]);

    let history = bridge.get_chat_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_user);
    assert_eq!(
        history[1].parts,
        vec![HistoryPart::Text("partial".to_string())]
    );
}

#[tokio::test]
async fn test_failed_chat_turn_leaves_history_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;
    bridge.init_chat(Vec::new()).await.unwrap();

    let result = bridge.send_chat_message("hi", &[], None).await;

    assert!(result.is_err());
    assert!(bridge.get_chat_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_count_chat_tokens_omits_empty_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "hello"}], "role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;
    bridge
        .init_chat(vec![ChatHistoryItem::text(true, "hello")])
        .await
        .unwrap();

    let count = bridge.count_chat_tokens(None, &[]).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_count_chat_tokens_appends_pending_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .and(body_json(json!({
            "contents": [
                {"parts": [{"text": "hello"}], "role": "user"},
                {"parts": [{"text": "and this?"}], "role": "user"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let bridge = test_bridge(server.uri());
    init_test_model(&bridge).await;
    bridge
        .init_chat(vec![ChatHistoryItem::text(true, "hello")])
        .await
        .unwrap();

    let count = bridge
        .count_chat_tokens(Some("and this?"), &[])
        .await
        .unwrap();
    assert_eq!(count, 9);
}
