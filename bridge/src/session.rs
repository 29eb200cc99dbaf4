//! Session state: the installed model and the chat bound to it.
//!
//! # Locking discipline
//!
//! State-mutating operations (`init_model`, `init_chat`,
//! `send_chat_message`) serialize on the write lock; `send_chat_message`
//! holds it across the vendor call because it appends to chat history.
//! Read-only operations take the read lock just long enough to clone a
//! snapshot of the handle they need, then run against the snapshot. A
//! snapshot taken before a concurrent re-init keeps serving the call it
//! was taken for.

use tokio::sync::RwLock;

use geminix_genai::Chat;
use geminix_genai::GenerativeModel;

use crate::error::GeminiXError;
use crate::error::Result;

/// What a session currently holds.
///
/// A chat is only ever present together with the model that created it;
/// installing a model drops the chat.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) model: Option<GenerativeModel>,
    pub(crate) chat: Option<Chat>,
}

/// Per-session handle state behind a single reader-writer lock.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) state: RwLock<SessionState>,
}

impl Session {
    /// An empty session: no model, no chat.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a model, dropping any chat bound to the previous one.
    pub(crate) async fn install_model(&self, model: GenerativeModel) {
        let mut state = self.state.write().await;
        state.model = Some(model);
        state.chat = None;
    }

    /// Clone the installed model for a read-only call.
    pub(crate) async fn model_snapshot(&self) -> Result<GenerativeModel> {
        self.state
            .read()
            .await
            .model
            .clone()
            .ok_or(GeminiXError::ModelNotInitialized)
    }

    /// Clone the live chat for a read-only call.
    pub(crate) async fn chat_snapshot(&self) -> Result<Chat> {
        self.state
            .read()
            .await
            .chat
            .clone()
            .ok_or(GeminiXError::ChatNotInitialized)
    }
}

#[cfg(test)]
#[path = "session.test.rs"]
mod tests;
