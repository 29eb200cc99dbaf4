use futures::stream;
use pretty_assertions::assert_eq;

use super::*;
use crate::error::GeminiError;
use crate::types::Candidate;
use crate::types::Content;

fn text_chunk(text: &str) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates: Some(vec![Candidate {
            content: Some(Content::model(text)),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn stream_of(items: Vec<Result<GenerateContentResponse>>) -> GenerateContentStream {
    GenerateContentStream::new(Box::pin(stream::iter(items)))
}

#[tokio::test]
async fn test_next_accumulates_text() {
    let mut stream = stream_of(vec![Ok(text_chunk("Hello")), Ok(text_chunk(" world"))]);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text().as_deref(), Some("Hello"));
    assert_eq!(stream.aggregated_text(), "Hello");

    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.text().as_deref(), Some(" world"));
    assert_eq!(stream.aggregated_text(), "Hello world");

    assert!(stream.next().await.is_none());
    assert!(stream.is_finished());
}

#[tokio::test]
async fn test_collect_text_drains_everything() {
    let stream = stream_of(vec![
        Ok(text_chunk("a")),
        Ok(text_chunk("b")),
        Ok(text_chunk("c")),
    ]);
    assert_eq!(stream.collect_text().await.unwrap(), "abc");
}

#[tokio::test]
async fn test_chunks_without_text_do_not_affect_accumulation() {
    let usage_only = GenerateContentResponse::default();
    let stream = stream_of(vec![
        Ok(text_chunk("x")),
        Ok(usage_only),
        Ok(text_chunk("y")),
    ]);
    assert_eq!(stream.collect_text().await.unwrap(), "xy");
}

#[tokio::test]
async fn test_error_finishes_the_stream() {
    let mut stream = stream_of(vec![
        Ok(text_chunk("partial")),
        Err(GeminiError::Network("reset".to_string())),
        Ok(text_chunk("never seen")),
    ]);

    assert!(stream.next().await.unwrap().is_ok());
    assert!(stream.next().await.unwrap().is_err());
    assert!(stream.is_finished());
    assert!(stream.next().await.is_none());
    assert_eq!(stream.aggregated_text(), "partial");
}

#[tokio::test]
async fn test_collect_text_propagates_error() {
    let stream = stream_of(vec![
        Ok(text_chunk("a")),
        Err(GeminiError::Parse("bad payload".to_string())),
    ]);
    assert!(stream.collect_text().await.is_err());
}

#[tokio::test]
async fn test_empty_stream_yields_empty_text() {
    let stream = stream_of(vec![]);
    assert_eq!(stream.collect_text().await.unwrap(), "");
}
