//! Server-sent event parsing for streamed generation.
//!
//! `streamGenerateContent?alt=sse` responds with a `text/event-stream`
//! body: one `data:` payload per generated chunk, a JSON error envelope
//! if the stream fails mid-flight, and an optional `[DONE]` sentinel.
//! This module turns the raw byte stream into a stream of parsed
//! [`GenerateContentResponse`] values.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;

use crate::error::GeminiError;
use crate::error::Result;
use crate::types::ErrorResponse;
use crate::types::GenerateContentResponse;

/// Boxed stream of parsed streaming responses.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// Sentinel payload some endpoints send to terminate the stream.
const DONE_PAYLOAD: &str = "[DONE]";

/// Incremental SSE parser: bytes in, complete event payloads out.
///
/// Events may be split across arbitrary chunk boundaries, including in
/// the middle of a multi-byte character, so the unterminated tail is
/// buffered as raw bytes. Accepts CRLF line endings; ignores comment
/// lines and non-`data` fields; joins multi-line `data:` fields with a
/// newline per the SSE spec. An unterminated trailing event at EOF is
/// discarded.
#[derive(Debug, Default)]
pub(crate) struct SseParser {
    partial: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseParser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes; returns every event payload it completes.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.partial.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let mut line_bytes: Vec<u8> = self.partial.drain(..=pos).collect();
            line_bytes.pop();
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.pop();
            }
            let line = String::from_utf8(line_bytes).map_err(|e| {
                GeminiError::Parse(format!("invalid UTF-8 in event stream: {e}"))
            })?;

            if line.is_empty() {
                // Blank line dispatches the accumulated event.
                if !self.data_lines.is_empty() {
                    payloads.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if let Some(value) = line.strip_prefix("data:") {
                let value = value.strip_prefix(' ').unwrap_or(value);
                self.data_lines.push(value.to_string());
            }
            // Comments (leading ':') and other fields are ignored.
        }
        Ok(payloads)
    }
}

/// Stream of complete event payload strings over a byte stream.
struct EventPayloadStream {
    source: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
    parser: SseParser,
    pending: VecDeque<String>,
    finished: bool,
}

impl Stream for EventPayloadStream {
    type Item = Result<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(payload) = this.pending.pop_front() {
                if payload == DONE_PAYLOAD {
                    this.finished = true;
                    this.pending.clear();
                    return Poll::Ready(None);
                }
                return Poll::Ready(Some(Ok(payload)));
            }
            if this.finished {
                return Poll::Ready(None);
            }
            match this.source.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => match this.parser.feed(&chunk) {
                    Ok(payloads) => this.pending.extend(payloads),
                    Err(e) => {
                        this.finished = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    this.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.finished = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Decode one event payload.
///
/// Returns `None` for payloads that do not carry a response (the `[DONE]`
/// sentinel never reaches this point).
fn decode_payload(payload: &str) -> Option<Result<GenerateContentResponse>> {
    // A mid-stream failure arrives as the standard error envelope.
    if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(payload) {
        return Some(Err(GeminiError::Api {
            code: envelope.error.code,
            message: envelope.error.message,
            status: envelope.error.status,
        }));
    }
    match serde_json::from_str::<GenerateContentResponse>(payload) {
        Ok(response) => Some(Ok(response)),
        Err(e) => Some(Err(GeminiError::Parse(format!(
            "invalid stream payload: {e}"
        )))),
    }
}

/// Adapt a raw byte stream into a stream of parsed responses.
pub(crate) fn response_stream<S, E>(source: S) -> ContentStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<GeminiError>,
{
    let bytes: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>> =
        Box::pin(source.map(|item| item.map_err(Into::into)));
    let events = EventPayloadStream {
        source: bytes,
        parser: SseParser::new(),
        pending: VecDeque::new(),
        finished: false,
    };
    Box::pin(events.filter_map(|payload| async move {
        match payload {
            Ok(data) => decode_payload(&data),
            Err(e) => Some(Err(e)),
        }
    }))
}

#[cfg(test)]
#[path = "sse.test.rs"]
mod tests;
