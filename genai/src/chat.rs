//! Stateful multi-turn chat bound to one model.
//!
//! # History recording
//!
//! `send_message` records the user turn and the model reply once the
//! vendor call succeeds. `send_message_stream` records nothing: the model
//! turn is not known until the stream has been drained, so the caller
//! records the completed exchange with [`Chat::record_history`]. A failed
//! exchange leaves history untouched.

use tracing::debug;

use crate::error::Result;
use crate::model::GenerativeModel;
use crate::streaming::GenerateContentStream;
use crate::types::Content;
use crate::types::GenerateContentResponse;
use crate::types::Part;

/// An append-only conversation with a model.
#[derive(Debug, Clone)]
pub struct Chat {
    model: GenerativeModel,
    history: Vec<Content>,
}

impl Chat {
    /// Start a chat with empty history.
    pub fn new(model: GenerativeModel) -> Self {
        Self {
            model,
            history: Vec::new(),
        }
    }

    /// Start a chat seeded with prior turns, oldest first.
    pub fn with_history(model: GenerativeModel, history: Vec<Content>) -> Self {
        Self {
            model,
            history,
        }
    }

    /// The model this chat is bound to.
    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }

    /// Conversation history, oldest first.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Append one content item to the history.
    pub fn add_to_history(&mut self, content: Content) {
        self.history.push(content);
    }

    /// Record a completed exchange: the user turn, then the model reply.
    pub fn record_history(&mut self, user: Content, model: Content) {
        self.history.push(user);
        self.history.push(model);
    }

    /// Drop all history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Send one user turn and wait for the complete reply.
    ///
    /// On success the exchange is appended to history.
    pub async fn send_message(&mut self, parts: Vec<Part>) -> Result<GenerateContentResponse> {
        let user = Content::with_parts("user", parts);
        let mut contents = self.history.clone();
        contents.push(user.clone());

        debug!(history_len = self.history.len(), "sending chat message");
        let response = self.model.generate_content(contents).await?;

        if let Some(reply) = response.content() {
            let mut reply = reply.clone();
            if reply.role.is_none() {
                reply.role = Some("model".to_string());
            }
            self.record_history(user, reply);
        }
        Ok(response)
    }

    /// Send one user turn and stream the reply.
    ///
    /// History is untouched; call [`Chat::record_history`] with the
    /// accumulated reply once the stream completes.
    pub async fn send_message_stream(&self, parts: Vec<Part>) -> Result<GenerateContentStream> {
        let mut contents = self.history.clone();
        contents.push(Content::with_parts("user", parts));

        debug!(history_len = self.history.len(), "streaming chat message");
        self.model.generate_content_stream(contents).await
    }
}

#[cfg(test)]
#[path = "chat.test.rs"]
mod tests;
