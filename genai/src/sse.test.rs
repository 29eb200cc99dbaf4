use futures::StreamExt;
use futures::stream;
use pretty_assertions::assert_eq;

use super::*;

fn chunked(chunks: Vec<&'static str>) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
    stream::iter(
        chunks
            .into_iter()
            .map(|c| Ok(Bytes::from(c)))
            .collect::<Vec<_>>(),
    )
}

#[test]
fn test_parser_single_event() {
    let mut parser = SseParser::new();
    let payloads = parser.feed(b"data: {\"a\":1}\n\n").unwrap();
    assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
}

#[test]
fn test_parser_without_space_after_colon() {
    let mut parser = SseParser::new();
    let payloads = parser.feed(b"data:{\"a\":1}\n\n").unwrap();
    assert_eq!(payloads, vec!["{\"a\":1}".to_string()]);
}

#[test]
fn test_parser_joins_multiline_data() {
    let mut parser = SseParser::new();
    let payloads = parser.feed(b"data: first\ndata: second\n\n").unwrap();
    assert_eq!(payloads, vec!["first\nsecond".to_string()]);
}

#[test]
fn test_parser_crlf_lines() {
    let mut parser = SseParser::new();
    let payloads = parser.feed(b"data: one\r\n\r\ndata: two\r\n\r\n").unwrap();
    assert_eq!(payloads, vec!["one".to_string(), "two".to_string()]);
}

#[test]
fn test_parser_event_split_across_chunks() {
    let mut parser = SseParser::new();
    assert!(parser.feed(b"data: hel").unwrap().is_empty());
    assert!(parser.feed(b"lo\n").unwrap().is_empty());
    let payloads = parser.feed(b"\n").unwrap();
    assert_eq!(payloads, vec!["hello".to_string()]);
}

#[test]
fn test_parser_multibyte_char_split_across_chunks() {
    let bytes = "data: caf\u{e9}\n\n".as_bytes();
    // Split inside the two-byte encoding of U+00E9.
    let split = bytes.len() - 3;
    let mut parser = SseParser::new();
    assert!(parser.feed(&bytes[..split]).unwrap().is_empty());
    let payloads = parser.feed(&bytes[split..]).unwrap();
    assert_eq!(payloads, vec!["caf\u{e9}".to_string()]);
}

#[test]
fn test_parser_ignores_comments_and_other_fields() {
    let mut parser = SseParser::new();
    let payloads = parser
        .feed(b": keep-alive\nevent: message\nid: 3\ndata: x\n\n")
        .unwrap();
    assert_eq!(payloads, vec!["x".to_string()]);
}

#[test]
fn test_parser_blank_line_without_data_emits_nothing() {
    let mut parser = SseParser::new();
    assert!(parser.feed(b"\n\n\n").unwrap().is_empty());
}

#[tokio::test]
async fn test_stream_decodes_responses_in_order() {
    let source = chunked(vec![
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"b\"}]}}]}\n\n",
    ]);
    let mut stream = response_stream(source);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.text().as_deref(), Some("a"));
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.text().as_deref(), Some("b"));
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_stream_stops_at_done_sentinel() {
    let source = chunked(vec![
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"}]}}]}\n\n",
        "data: [DONE]\n\ndata: {\"candidates\":[]}\n\n",
    ]);
    let mut stream = response_stream(source);

    assert!(stream.next().await.unwrap().is_ok());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn test_stream_surfaces_error_envelope() {
    let source = chunked(vec![
        "data: {\"error\":{\"code\":500,\"message\":\"internal\",\"status\":\"INTERNAL\"}}\n\n",
    ]);
    let mut stream = response_stream(source);

    let err = stream.next().await.unwrap().unwrap_err();
    match err {
        GeminiError::Api {
            code,
            message,
            status,
        } => {
            assert_eq!(code, 500);
            assert_eq!(message, "internal");
            assert_eq!(status, "INTERNAL");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stream_surfaces_invalid_payload_as_parse_error() {
    let source = chunked(vec!["data: not json\n\n"]);
    let mut stream = response_stream(source);

    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, GeminiError::Parse(_)));
}

#[tokio::test]
async fn test_stream_propagates_source_errors() {
    let source = stream::iter(vec![
        Ok(Bytes::from(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"}]}}]}\n\n",
        )),
        Err(GeminiError::Network("connection reset".to_string())),
    ]);
    let mut stream = response_stream(source);

    assert!(stream.next().await.unwrap().is_ok());
    let err = stream.next().await.unwrap().unwrap_err();
    assert!(matches!(err, GeminiError::Network(_)));
}

#[tokio::test]
async fn test_stream_drops_unterminated_trailing_event() {
    let source = chunked(vec!["data: {\"candidates\":[]}"]);
    let mut stream = response_stream(source);

    assert!(stream.next().await.is_none());
}
