//! Live integration tests against the real Gemini API.
//!
//! These tests require a valid `GEMINI_API_KEY` environment variable and
//! are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p geminix-genai -- --ignored --test-threads=1
//! ```

use geminix_genai::Client;
use geminix_genai::Content;
use geminix_genai::Part;

const LIVE_MODEL: &str = "gemini-2.0-flash";

fn live_client() -> Client {
    Client::from_env().expect("GEMINI_API_KEY must be set for live tests")
}

#[tokio::test]
#[ignore]
async fn test_live_text_generation() {
    let model = live_client().generative_model(LIVE_MODEL);

    let response = model
        .generate_content(vec![Content::user(
            "Say 'hello' in exactly one word, nothing else.",
        )])
        .await
        .expect("generateContent failed");

    let text = response.text().unwrap_or_default();
    assert!(
        text.to_lowercase().contains("hello"),
        "Expected 'hello' in response, got: {text}"
    );
}

#[tokio::test]
#[ignore]
async fn test_live_streaming() {
    let model = live_client().generative_model(LIVE_MODEL);

    let stream = model
        .generate_content_stream(vec![Content::user("Count from 1 to 5.")])
        .await
        .expect("streamGenerateContent failed");

    let text = stream.collect_text().await.expect("stream failed");
    assert!(
        text.contains('5'),
        "Expected '5' in streamed response, got: {text}"
    );
}

#[tokio::test]
#[ignore]
async fn test_live_count_tokens() {
    let model = live_client().generative_model(LIVE_MODEL);

    let count = model
        .count_tokens(vec![Content::user("How many tokens is this sentence?")])
        .await
        .expect("countTokens failed");

    assert!(count > 0, "Expected non-zero token count, got: {count}");
}

#[tokio::test]
#[ignore]
async fn test_live_multi_turn_chat() {
    let model = live_client().generative_model(LIVE_MODEL);
    let mut chat = model.start_chat();

    chat.send_message(vec![Part::text("My name is Alice. Please remember it.")])
        .await
        .expect("first turn failed");

    let response = chat
        .send_message(vec![Part::text("What is my name?")])
        .await
        .expect("second turn failed");

    let text = response.text().unwrap_or_default();
    assert!(
        text.to_lowercase().contains("alice"),
        "Expected 'alice' in response, got: {text}"
    );
    assert_eq!(chat.history().len(), 4);
}
