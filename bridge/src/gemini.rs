//! The bridge facade: host-invocable operations over one session.
//!
//! One [`GeminiX`] owns one [`Session`]. `init_model` installs the model
//! every other operation runs against; chat-scoped operations
//! additionally require `init_chat`. Locking follows the discipline
//! documented in [`crate::session`]: mutating operations serialize on
//! the write lock (`send_chat_message` holds it across the vendor call),
//! read-only operations run against cloned snapshots.

use serde::Serialize;
use tracing::debug;
use tracing::instrument;

use geminix_genai::Client;
use geminix_genai::ClientConfig;
use geminix_genai::Content;
use geminix_genai::GeminiError;
use geminix_genai::GenerateContentResponse;

use crate::content::ChatHistoryItem;
use crate::content::HistoryEntry;
use crate::content::build_parts;
use crate::content::content_to_history_entry;
use crate::content::history_item_to_content;
use crate::error::GeminiXError;
use crate::error::Result;
use crate::image;
use crate::image::ImageReference;
use crate::params::ModelParams;
use crate::session::Session;
use crate::stream::ChunkSink;
use crate::stream::forward_stream;

/// Behavior overrides for a bridge instance.
#[derive(Debug, Clone, Default)]
pub struct GeminiXConfig {
    /// Override for the vendor API base URL. `None` uses the production
    /// endpoint.
    pub base_url: Option<String>,
}

/// One bridge instance: a [`Session`] plus the operations hosts invoke
/// on it.
#[derive(Debug, Default)]
pub struct GeminiX {
    session: Session,
    config: GeminiXConfig,
}

impl GeminiX {
    /// A bridge with no model installed, talking to the production API.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge with behavior overrides.
    pub fn with_config(config: GeminiXConfig) -> Self {
        Self {
            session: Session::new(),
            config,
        }
    }

    /// Build a model from the supplied parameters and install it.
    ///
    /// Replaces any previously installed model and invalidates any
    /// active chat. Parameter conversion happens before anything is
    /// replaced, so a bad parameter bag leaves the session as it was.
    #[instrument(skip(self, params), fields(model = %params.model_name))]
    pub async fn init_model(&self, params: ModelParams) -> Result<()> {
        let generation_config = params.to_generation_config();
        let safety_settings = params.to_safety_settings()?;

        let mut client_config = ClientConfig::new(params.api_key);
        if let Some(base_url) = &self.config.base_url {
            client_config = client_config.base_url(base_url.clone());
        }
        let client = Client::new(client_config).map_err(|err| match err {
            GeminiError::Config(message) => GeminiXError::InvalidArgument(message),
            other => GeminiXError::Vendor(other),
        })?;

        let mut model = client.generative_model(params.model_name);
        if let Some(config) = generation_config {
            model = model.with_generation_config(config);
        }
        if let Some(settings) = safety_settings {
            model = model.with_safety_settings(settings);
        }

        self.session.install_model(model).await;
        debug!("model installed, chat reset");
        Ok(())
    }

    /// Send one standalone message and return the reply text.
    ///
    /// With a sink, the reply is streamed through it chunk by chunk and
    /// the accumulated text is returned once the stream ends; the
    /// accumulation is never re-delivered through the sink. Without a
    /// sink, the call blocks for the complete reply.
    #[instrument(skip(self, input_text, images, sink), fields(images = images.len(), streaming = sink.is_some()))]
    pub async fn send_message(
        &self,
        input_text: &str,
        images: &[ImageReference],
        sink: Option<&mut dyn ChunkSink>,
    ) -> Result<String> {
        let model = self.session.model_snapshot().await?;

        let resolved = image::resolve_all(images)?;
        let contents = vec![Content::with_parts("user", build_parts(input_text, &resolved))];

        match sink {
            Some(sink) => {
                let stream = model.generate_content_stream(contents).await?;
                forward_stream(stream, false, sink).await
            }
            None => {
                let response = model.generate_content(contents).await?;
                response_text(&response)
            }
        }
    }

    /// Count the tokens one standalone message would occupy.
    #[instrument(skip(self, input_text, images), fields(images = images.len()))]
    pub async fn count_tokens(&self, input_text: &str, images: &[ImageReference]) -> Result<i32> {
        let model = self.session.model_snapshot().await?;

        let resolved = image::resolve_all(images)?;
        let contents = vec![Content::with_parts("user", build_parts(input_text, &resolved))];

        let count = model.count_tokens(contents).await?;
        Ok(count)
    }

    /// Start a chat on the installed model, seeded with prior turns.
    ///
    /// Replaces any previous chat. Seed turns are converted in order
    /// before the chat is swapped in, so a bad turn leaves the previous
    /// chat untouched.
    #[instrument(skip(self, history), fields(turns = history.len()))]
    pub async fn init_chat(&self, history: Vec<ChatHistoryItem>) -> Result<()> {
        let mut state = self.session.state.write().await;
        let model = state.model.as_ref().ok_or(GeminiXError::ModelNotInitialized)?;

        let mut contents = Vec::with_capacity(history.len());
        for item in &history {
            contents.push(history_item_to_content(item)?);
        }

        let chat = model.start_chat_with_history(contents);
        state.chat = Some(chat);
        debug!("chat started");
        Ok(())
    }

    /// Send one chat turn and return the reply text.
    ///
    /// The write lock is held across the vendor call: the reply is
    /// appended to chat history, so concurrent chat turns serialize. A
    /// failed turn leaves history untouched. Streaming behaves as in
    /// [`GeminiX::send_message`], with the completed exchange recorded
    /// after the stream ends.
    #[instrument(skip(self, input_text, images, sink), fields(images = images.len(), streaming = sink.is_some()))]
    pub async fn send_chat_message(
        &self,
        input_text: &str,
        images: &[ImageReference],
        sink: Option<&mut dyn ChunkSink>,
    ) -> Result<String> {
        let mut state = self.session.state.write().await;
        let chat = state.chat.as_mut().ok_or(GeminiXError::ChatNotInitialized)?;

        let resolved = image::resolve_all(images)?;
        let parts = build_parts(input_text, &resolved);

        match sink {
            Some(sink) => {
                let stream = chat.send_message_stream(parts.clone()).await?;
                let accumulated = forward_stream(stream, true, sink).await?;
                chat.record_history(
                    Content::with_parts("user", parts),
                    Content::model(accumulated.clone()),
                );
                Ok(accumulated)
            }
            None => {
                let response = chat.send_message(parts).await?;
                response_text(&response)
            }
        }
    }

    /// Count the tokens the chat history plus an optional next turn
    /// would occupy.
    ///
    /// The next turn is appended to the counted contents only when it
    /// carries text or images; an empty turn counts the history alone.
    #[instrument(skip(self, input_text, images), fields(images = images.len()))]
    pub async fn count_chat_tokens(
        &self,
        input_text: Option<&str>,
        images: &[ImageReference],
    ) -> Result<i32> {
        let chat = self.session.chat_snapshot().await?;

        let resolved = image::resolve_all(images)?;
        let parts = build_parts(input_text.unwrap_or(""), &resolved);

        let mut contents = chat.history().to_vec();
        if !parts.is_empty() {
            contents.push(Content::with_parts("user", parts));
        }

        let count = chat.model().count_tokens(contents).await?;
        Ok(count)
    }

    /// Marshal the current chat history, oldest turn first.
    #[instrument(skip(self))]
    pub async fn get_chat_history(&self) -> Result<Vec<HistoryEntry>> {
        let chat = self.session.chat_snapshot().await?;
        chat.history().iter().map(content_to_history_entry).collect()
    }
}

/// Extract the reply text of a completed response.
///
/// A response with no extractable text is reported as a block: the
/// prompt block reason when feedback names one, else the candidate
/// finish reason, else a generic wording.
fn response_text(response: &GenerateContentResponse) -> Result<String> {
    if let Some(text) = response.text() {
        return Ok(text);
    }

    let reason = response
        .block_reason()
        .map(wire_name)
        .or_else(|| response.finish_reason().map(wire_name))
        .unwrap_or_else(|| "no content returned".to_string());
    Err(GeminiError::Blocked(reason).into())
}

/// The wire name of a unit enum value, e.g. `SAFETY`.
fn wire_name<T: Serialize>(value: T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => "UNKNOWN".to_string(),
    }
}

#[cfg(test)]
#[path = "gemini.test.rs"]
mod tests;
