//! Response forwarding: ordered chunk delivery with back-pressure.

use async_trait::async_trait;
use tracing::debug;

use geminix_genai::GenerateContentStream;

use crate::error::Result;

/// Destination for intermediate streamed chunks.
///
/// Awaiting [`ChunkSink::deliver`] is the acknowledgment: the forwarder
/// does not pull the next vendor chunk until the future resolves, so a
/// slow consumer slows the stream instead of queueing unbounded chunks.
#[async_trait]
pub trait ChunkSink: Send {
    /// Deliver one chunk of response text.
    async fn deliver(&mut self, chunk: &str, is_chat: bool) -> Result<()>;
}

/// Drain a vendor stream through a sink and return the accumulated text.
///
/// Each chunk's text is delivered in production order as it arrives.
/// The accumulation is returned exactly once as the terminal value and
/// is never re-delivered through the sink. Chunks with no text are
/// skipped. A sink or vendor failure stops the drain and becomes the
/// call's failure; chunks already delivered stand.
pub async fn forward_stream(
    mut stream: GenerateContentStream,
    is_chat: bool,
    sink: &mut dyn ChunkSink,
) -> Result<String> {
    let mut delivered = 0usize;
    while let Some(response) = stream.next().await {
        let response = response?;
        if let Some(text) = response.text() {
            if text.is_empty() {
                continue;
            }
            sink.deliver(&text, is_chat).await?;
            delivered += 1;
        }
    }
    debug!(chunks = delivered, is_chat, "stream drained");
    Ok(stream.aggregated_text().to_string())
}

/// Sink that records every delivery in memory.
#[derive(Debug, Default)]
pub struct CollectChunks {
    /// Delivered chunk texts, in order.
    pub chunks: Vec<String>,

    /// The `is_chat` flag observed on each delivery.
    pub flags: Vec<bool>,
}

impl CollectChunks {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All delivered chunks joined in order.
    pub fn concatenated(&self) -> String {
        self.chunks.concat()
    }
}

#[async_trait]
impl ChunkSink for CollectChunks {
    async fn deliver(&mut self, chunk: &str, is_chat: bool) -> Result<()> {
        self.chunks.push(chunk.to_string());
        self.flags.push(is_chat);
        Ok(())
    }
}

#[cfg(test)]
#[path = "stream.test.rs"]
mod tests;
