use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;

use super::*;
use crate::client::Client;
use crate::config::ClientConfig;

fn test_chat(base_url: String) -> Chat {
    let client = Client::new(ClientConfig::new("test-key").base_url(base_url)).unwrap();
    Chat::new(GenerativeModel::new(client, "gemini-2.0-flash"))
}

fn reply_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
}

fn first_text(content: &Content) -> &str {
    content.parts.as_ref().unwrap()[0].text.as_deref().unwrap()
}

#[test]
fn test_with_history_preserves_order() {
    let client = Client::with_api_key("k").unwrap();
    let model = GenerativeModel::new(client, "gemini-pro");
    let chat = Chat::with_history(
        model,
        vec![Content::user("first"), Content::model("second")],
    );

    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history()[0].role, Some("user".to_string()));
    assert_eq!(chat.history()[1].role, Some("model".to_string()));
}

#[test]
fn test_add_and_clear_history() {
    let client = Client::with_api_key("k").unwrap();
    let mut chat = Chat::new(GenerativeModel::new(client, "gemini-pro"));

    chat.add_to_history(Content::user("hello"));
    assert_eq!(chat.history().len(), 1);

    chat.clear_history();
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn test_send_message_records_both_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("four")))
        .mount(&server)
        .await;

    let mut chat = test_chat(server.uri());
    let response = chat
        .send_message(vec![Part::text("what is 2 + 2?")])
        .await
        .unwrap();

    assert_eq!(response.text().as_deref(), Some("four"));
    assert_eq!(chat.history().len(), 2);
    assert_eq!(chat.history()[0].role, Some("user".to_string()));
    assert_eq!(chat.history()[1].role, Some("model".to_string()));
    assert_eq!(first_text(&chat.history()[1]), "four");
}

#[tokio::test]
async fn test_send_message_fills_missing_reply_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "ok"}]}}]
        })))
        .mount(&server)
        .await;

    let mut chat = test_chat(server.uri());
    chat.send_message(vec![Part::text("hi")]).await.unwrap();

    assert_eq!(chat.history()[1].role, Some("model".to_string()));
}

#[tokio::test]
async fn test_failed_send_message_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut chat = test_chat(server.uri());
    let result = chat.send_message(vec![Part::text("hi")]).await;

    assert!(result.is_err());
    assert!(chat.history().is_empty());
}

#[tokio::test]
async fn test_send_message_stream_does_not_record() {
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

    let mut chat = test_chat(server.uri());
    let stream = chat
        .send_message_stream(vec![Part::text("hi")])
        .await
        .unwrap();
    let text = stream.collect_text().await.unwrap();

    assert_eq!(text, "partial");
    assert!(chat.history().is_empty());

    chat.record_history(
        Content::with_parts("user", vec![Part::text("hi")]),
        Content::model(text),
    );
    assert_eq!(chat.history().len(), 2);
    assert_eq!(first_text(&chat.history()[1]), "partial");
}

#[tokio::test]
async fn test_send_message_includes_prior_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "contents": [
                {"parts": [{"text": "earlier"}], "role": "user"},
                {"parts": [{"text": "noted"}], "role": "model"},
                {"parts": [{"text": "now"}], "role": "user"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply_body("later")))
        .expect(1)
        .mount(&server)
        .await;

    let mut chat = test_chat(server.uri());
    chat.add_to_history(Content::user("earlier"));
    chat.add_to_history(Content::model("noted"));
    chat.send_message(vec![Part::text("now")]).await.unwrap();

    assert_eq!(chat.history().len(), 4);
}
