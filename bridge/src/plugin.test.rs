use std::sync::Mutex;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::*;
use crate::gemini::GeminiXConfig;

#[derive(Default)]
struct RecordingEmitter {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingEmitter {
    fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventEmitter for RecordingEmitter {
    async fn emit(&self, event: &str, payload: Value) {
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), payload));
    }
}

fn test_plugin(base_url: String) -> (GeminiXPlugin, Arc<RecordingEmitter>) {
    let emitter = Arc::new(RecordingEmitter::default());
    let bridge = GeminiX::with_config(GeminiXConfig {
        base_url: Some(base_url),
    });
    let plugin = GeminiXPlugin::with_bridge(bridge, emitter.clone());
    (plugin, emitter)
}

async fn init_test_model(plugin: &GeminiXPlugin, model: &str) {
    plugin
        .init_model(json!({"params": {"modelName": model, "apiKey": "test-key"}}))
        .await
        .unwrap();
}

fn reply_body(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

#[tokio::test]
async fn test_init_model_resolves_null() {
    let (plugin, emitter) = test_plugin("http://unused.invalid".to_string());

    let resolution = plugin
        .init_model(json!({"params": {"modelName": "gemini-pro", "apiKey": "k"}}))
        .await
        .unwrap();

    assert_eq!(resolution, Value::Null);
    assert!(emitter.events().is_empty());
}

#[tokio::test]
async fn test_init_model_without_params_is_invalid_argument() {
    let (plugin, _emitter) = test_plugin("http://unused.invalid".to_string());

    let err = plugin.init_model(json!({})).await.unwrap_err();

    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
}

#[tokio::test]
async fn test_send_message_without_input_text_is_invalid_argument() {
    let (plugin, emitter) = test_plugin("http://unused.invalid".to_string());
    init_test_model(&plugin, "gemini-pro").await;

    let err = plugin
        .send_message(json!({"options": {"streamResponse": true}}))
        .await
        .unwrap_err();

    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
    assert!(emitter.events().is_empty());
}

#[tokio::test]
async fn test_send_message_resolves_without_events() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("4")))
        .expect(1)
        .mount(&server)
        .await;

    let (plugin, emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-pro").await;

    let resolution = plugin
        .send_message(json!({"inputText": "2 + 2 = ?"}))
        .await
        .unwrap();

    assert_eq!(resolution, json!({"response": "4", "isChat": false}));
    assert!(emitter.events().is_empty());
}

#[tokio::test]
async fn test_streaming_send_message_emits_chunks_then_resolves() {
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

    let (plugin, emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-2.0-flash").await;

    let resolution = plugin
        .send_message(json!({
            "inputText": "2 + 2 = ?",
            "options": {"streamResponse": true}
        }))
        .await
        .unwrap();

    assert_eq!(resolution, json!({"response": "2 + 2 = 4", "isChat": false}));

    let events = emitter.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].0, RESPONSE_CHUNK_EVENT);
    assert_eq!(events[0].1, json!({"response": "2 + 2 ", "isChat": false}));
    assert_eq!(events[1].1, json!({"response": "= 4", "isChat": false}));

    let concatenated: String = events
        .iter()
        .map(|(_, payload)| payload["response"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(concatenated, "2 + 2 = 4");
}

#[tokio::test]
async fn test_count_tokens_empty_options_equals_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .and(body_json(json!({
            "contents": [{"parts": [{"text": "abc"}], "role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 2})))
        .expect(2)
        .mount(&server)
        .await;

    let (plugin, _emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-2.0-flash").await;

    let omitted = plugin
        .count_tokens(json!({"inputText": "abc"}))
        .await
        .unwrap();
    let empty = plugin
        .count_tokens(json!({"inputText": "abc", "options": {}}))
        .await
        .unwrap();

    assert_eq!(omitted, json!({"count": 2, "isChat": false}));
    assert_eq!(empty, omitted);
}

#[tokio::test]
async fn test_init_chat_without_history_resolves_null() {
    let (plugin, _emitter) = test_plugin("http://unused.invalid".to_string());
    init_test_model(&plugin, "gemini-pro").await;

    let resolution = plugin.init_chat(json!({})).await.unwrap();
    assert_eq!(resolution, Value::Null);

    let history = plugin.get_chat_history().await.unwrap();
    assert_eq!(history, json!({"history": []}));
}

#[tokio::test]
async fn test_streaming_chat_message_flags_is_chat() {
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

    let (plugin, emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-2.0-flash").await;
    plugin.init_chat(json!({})).await.unwrap();

    let resolution = plugin
        .send_chat_message(json!({
            "inputText": "hi",
            "options": {"streamResponse": true}
        }))
        .await
        .unwrap();

    assert_eq!(resolution, json!({"response": "partial", "isChat": true}));

    let events = emitter.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].1, json!({"response": "par", "isChat": true}));
    assert_eq!(events[1].1, json!({"response": "tial", "isChat": true}));
}

#[tokio::test]
async fn test_get_chat_history_marshals_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("doing well")))
        .mount(&server)
        .await;

    let (plugin, _emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-2.0-flash").await;
    plugin
        .init_chat(json!({"chatHistory": [{"isUser": true, "text": "hello"}]}))
        .await
        .unwrap();
    plugin
        .send_chat_message(json!({"inputText": "how are you?"}))
        .await
        .unwrap();

    let resolution = plugin.get_chat_history().await.unwrap();

    assert_eq!(
        resolution,
        json!({"history": [
            {"isUser": true, "parts": [{"type": "text", "content": "hello"}]},
            {"isUser": true, "parts": [{"type": "text", "content": "how are you?"}]},
            {"isUser": false, "parts": [{"type": "text", "content": "doing well"}]}
        ]})
    );
}

#[tokio::test]
async fn test_count_chat_tokens_resolution_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:countTokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalTokens": 5})))
        .mount(&server)
        .await;

    let (plugin, _emitter) = test_plugin(server.uri());
    init_test_model(&plugin, "gemini-2.0-flash").await;
    plugin.init_chat(json!({})).await.unwrap();

    let resolution = plugin
        .count_chat_tokens(json!({"options": {"inputText": "next"}}))
        .await
        .unwrap();

    assert_eq!(resolution, json!({"count": 5, "isChat": true}));
}

#[tokio::test]
async fn test_rejection_carries_message_text() {
    let (plugin, _emitter) = test_plugin("http://unused.invalid".to_string());

    let err = plugin
        .send_message(json!({"inputText": "hi"}))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Model not initialized");
}
