use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use futures::StreamExt;
use futures::stream;
use pretty_assertions::assert_eq;

use geminix_genai::Candidate;
use geminix_genai::Content;
use geminix_genai::ContentStream;
use geminix_genai::GeminiError;
use geminix_genai::GenerateContentResponse;

use super::*;
use crate::error::GeminiXError;

fn text_chunk(text: &str) -> geminix_genai::Result<GenerateContentResponse> {
    Ok(GenerateContentResponse {
        candidates: Some(vec![Candidate {
            content: Some(Content::model(text)),
            ..Default::default()
        }]),
        ..Default::default()
    })
}

fn stream_of(
    items: Vec<geminix_genai::Result<GenerateContentResponse>>,
) -> GenerateContentStream {
    let inner: ContentStream = Box::pin(stream::iter(items));
    GenerateContentStream::new(inner)
}

/// Sink that accepts a fixed number of deliveries, then fails.
struct FailAfter {
    remaining: usize,
}

#[async_trait::async_trait]
impl ChunkSink for FailAfter {
    async fn deliver(&mut self, _chunk: &str, _is_chat: bool) -> Result<()> {
        if self.remaining == 0 {
            return Err(GeminiXError::InvalidArgument("sink closed".to_string()));
        }
        self.remaining -= 1;
        Ok(())
    }
}

#[tokio::test]
async fn test_chunks_delivered_in_order_terminal_not_redelivered() {
    let stream = stream_of(vec![
        text_chunk("Once"),
        text_chunk(" upon"),
        text_chunk(" a time"),
    ]);
    let mut sink = CollectChunks::new();

    let terminal = forward_stream(stream, false, &mut sink).await.unwrap();

    assert_eq!(terminal, "Once upon a time");
    assert_eq!(sink.chunks, vec!["Once", " upon", " a time"]);
    assert_eq!(sink.concatenated(), terminal);
    assert_eq!(sink.flags, vec![false, false, false]);
}

#[tokio::test]
async fn test_is_chat_flag_reaches_sink() {
    let stream = stream_of(vec![text_chunk("hi")]);
    let mut sink = CollectChunks::new();

    forward_stream(stream, true, &mut sink).await.unwrap();

    assert_eq!(sink.flags, vec![true]);
}

#[tokio::test]
async fn test_textless_chunks_are_not_delivered() {
    let empty = Ok(GenerateContentResponse::default());
    let stream = stream_of(vec![text_chunk("a"), empty, text_chunk("b")]);
    let mut sink = CollectChunks::new();

    let terminal = forward_stream(stream, false, &mut sink).await.unwrap();

    assert_eq!(sink.chunks, vec!["a", "b"]);
    assert_eq!(terminal, "ab");
}

#[tokio::test]
async fn test_vendor_error_stops_drain_and_surfaces() {
    let stream = stream_of(vec![
        text_chunk("partial"),
        Err(GeminiError::Network("connection reset".to_string())),
        text_chunk("never seen"),
    ]);
    let mut sink = CollectChunks::new();

    let err = forward_stream(stream, false, &mut sink).await.unwrap_err();

    assert!(matches!(err, GeminiXError::Vendor(_)));
    assert_eq!(sink.chunks, vec!["partial"]);
}

#[tokio::test]
async fn test_sink_failure_stops_pulling_the_stream() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pulled);
    let source = stream::iter(vec![
        text_chunk("one"),
        text_chunk("two"),
        text_chunk("three"),
    ])
    .inspect(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let stream = GenerateContentStream::new(Box::pin(source));

    let mut sink = FailAfter { remaining: 1 };
    let err = forward_stream(stream, false, &mut sink).await.unwrap_err();

    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
    // "one" delivered, "two" rejected by the sink, "three" never pulled.
    assert_eq!(pulled.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_empty_stream_yields_empty_terminal() {
    let stream = stream_of(Vec::new());
    let mut sink = CollectChunks::new();

    let terminal = forward_stream(stream, false, &mut sink).await.unwrap();

    assert_eq!(terminal, "");
    assert!(sink.chunks.is_empty());
}
