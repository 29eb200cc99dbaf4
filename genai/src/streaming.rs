//! Pull-based wrapper over a streamed generation response.
//!
//! [`GenerateContentStream`] yields each chunk in production order while
//! accumulating chunk text, so the finished conversation text is
//! available without the caller keeping its own accumulator:
//!
//! ```ignore
//! let mut stream = client.generate_content_stream(model, &request).await?;
//! while let Some(chunk) = stream.next().await {
//!     print!("{}", chunk?.text().unwrap_or_default());
//! }
//! let full_text = stream.aggregated_text().to_string();
//! ```

use futures::StreamExt;

use crate::error::Result;
use crate::sse::ContentStream;
use crate::types::GenerateContentResponse;

/// An in-progress streamed generation.
pub struct GenerateContentStream {
    inner: ContentStream,
    aggregated_text: String,
    finished: bool,
}

impl GenerateContentStream {
    /// Wrap a parsed response stream.
    pub fn new(inner: ContentStream) -> Self {
        Self {
            inner,
            aggregated_text: String::new(),
            finished: false,
        }
    }

    /// Pull the next chunk.
    ///
    /// Returns `None` once the stream is exhausted. An error ends the
    /// stream; subsequent calls return `None`.
    pub async fn next(&mut self) -> Option<Result<GenerateContentResponse>> {
        if self.finished {
            return None;
        }
        match self.inner.next().await {
            Some(Ok(response)) => {
                if let Some(text) = response.text() {
                    self.aggregated_text.push_str(&text);
                }
                Some(Ok(response))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e))
            }
            None => {
                self.finished = true;
                None
            }
        }
    }

    /// Text accumulated from every chunk pulled so far.
    pub fn aggregated_text(&self) -> &str {
        &self.aggregated_text
    }

    /// Whether the stream has ended (exhausted or failed).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the remaining chunks and return the full accumulated text.
    pub async fn collect_text(mut self) -> Result<String> {
        while let Some(chunk) = self.next().await {
            chunk?;
        }
        Ok(self.aggregated_text)
    }
}

impl std::fmt::Debug for GenerateContentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateContentStream")
            .field("aggregated_chars", &self.aggregated_text.len())
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
#[path = "streaming.test.rs"]
mod tests;
