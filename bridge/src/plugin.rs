//! JSON plugin surface for host bridges.
//!
//! Hosts invoke plugin methods with loosely-typed argument bags and
//! receive JSON resolutions; intermediate streamed chunks go out as
//! `GeminiXResponseChunk` events. This module parses the bags, routes
//! streaming through the host's [`EventEmitter`], and shapes the
//! resolutions. A rejected call surfaces to the host as the error's
//! message text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;

use crate::content::ChatHistoryItem;
use crate::error::GeminiXError;
use crate::error::Result;
use crate::gemini::GeminiX;
use crate::image::ImageReference;
use crate::params::ModelParams;
use crate::stream::ChunkSink;

/// Event name streamed chunks are emitted under.
pub const RESPONSE_CHUNK_EVENT: &str = "GeminiXResponseChunk";

/// Host-side event channel.
///
/// Returning from [`EventEmitter::emit`] acknowledges delivery: the
/// streaming pipeline awaits it before pulling the next vendor chunk,
/// so a slow host listener slows the stream.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Emit one named event with a JSON payload.
    async fn emit(&self, event: &str, payload: Value);
}

/// Adapts the host emitter to the chunk forwarding interface, wrapping
/// each chunk in the `{response, isChat}` event payload.
struct EmitterSink {
    emitter: Arc<dyn EventEmitter>,
}

#[async_trait]
impl ChunkSink for EmitterSink {
    async fn deliver(&mut self, chunk: &str, is_chat: bool) -> Result<()> {
        self.emitter
            .emit(
                RESPONSE_CHUNK_EVENT,
                json!({"response": chunk, "isChat": is_chat}),
            )
            .await;
        Ok(())
    }
}

// ============================================================================
// Argument bags
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitModelArgs {
    params: ModelParams,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageArgs {
    input_text: String,

    #[serde(default)]
    options: Option<MessageOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageOptions {
    #[serde(default)]
    images: Option<Vec<ImageReference>>,

    #[serde(default)]
    stream_response: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitChatArgs {
    #[serde(default)]
    chat_history: Option<Vec<ChatHistoryItem>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountChatTokensArgs {
    #[serde(default)]
    options: Option<CountChatTokensOptions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountChatTokensOptions {
    #[serde(default)]
    input_text: Option<String>,

    #[serde(default)]
    images: Option<Vec<ImageReference>>,
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    serde_json::from_value(args).map_err(|err| GeminiXError::InvalidArgument(err.to_string()))
}

// ============================================================================
// Plugin
// ============================================================================

/// The host-facing plugin: one [`GeminiX`] bridge plus the host's event
/// emitter.
pub struct GeminiXPlugin {
    bridge: GeminiX,
    emitter: Arc<dyn EventEmitter>,
}

impl GeminiXPlugin {
    /// A plugin over a fresh bridge talking to the production API.
    pub fn new(emitter: Arc<dyn EventEmitter>) -> Self {
        Self::with_bridge(GeminiX::new(), emitter)
    }

    /// A plugin over an existing bridge.
    pub fn with_bridge(bridge: GeminiX, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            bridge,
            emitter,
        }
    }

    /// `initModel`: `{params}`. Resolves `null`.
    pub async fn init_model(&self, args: Value) -> Result<Value> {
        let args: InitModelArgs = parse_args(args)?;
        self.bridge.init_model(args.params).await?;
        Ok(Value::Null)
    }

    /// `sendMessage`: `{inputText, options?: {images?, streamResponse?}}`.
    /// Resolves `{response, isChat: false}` with the complete reply;
    /// `streamResponse: true` additionally emits each chunk as it
    /// arrives.
    pub async fn send_message(&self, args: Value) -> Result<Value> {
        let args: SendMessageArgs = parse_args(args)?;
        let options = args.options.unwrap_or_default();
        let images = options.images.unwrap_or_default();

        let response = if options.stream_response.unwrap_or(false) {
            let mut sink = self.emitter_sink();
            self.bridge
                .send_message(&args.input_text, &images, Some(&mut sink))
                .await?
        } else {
            self.bridge
                .send_message(&args.input_text, &images, None)
                .await?
        };

        Ok(json!({"response": response, "isChat": false}))
    }

    /// `countTokens`: `{inputText, options?: {images?}}`. Resolves
    /// `{count, isChat: false}`.
    pub async fn count_tokens(&self, args: Value) -> Result<Value> {
        let args: SendMessageArgs = parse_args(args)?;
        let images = args.options.unwrap_or_default().images.unwrap_or_default();

        let count = self.bridge.count_tokens(&args.input_text, &images).await?;
        Ok(json!({"count": count, "isChat": false}))
    }

    /// `initChat`: `{chatHistory?}`. Resolves `null`.
    pub async fn init_chat(&self, args: Value) -> Result<Value> {
        let args: InitChatArgs = parse_args(args)?;
        self.bridge
            .init_chat(args.chat_history.unwrap_or_default())
            .await?;
        Ok(Value::Null)
    }

    /// `sendChatMessage`: arguments as `sendMessage`. Resolves
    /// `{response, isChat: true}`.
    pub async fn send_chat_message(&self, args: Value) -> Result<Value> {
        let args: SendMessageArgs = parse_args(args)?;
        let options = args.options.unwrap_or_default();
        let images = options.images.unwrap_or_default();

        let response = if options.stream_response.unwrap_or(false) {
            let mut sink = self.emitter_sink();
            self.bridge
                .send_chat_message(&args.input_text, &images, Some(&mut sink))
                .await?
        } else {
            self.bridge
                .send_chat_message(&args.input_text, &images, None)
                .await?
        };

        Ok(json!({"response": response, "isChat": true}))
    }

    /// `countChatTokens`: `{options?: {inputText?, images?}}`. Resolves
    /// `{count, isChat: true}`.
    pub async fn count_chat_tokens(&self, args: Value) -> Result<Value> {
        let args: CountChatTokensArgs = parse_args(args)?;
        let options = args.options.unwrap_or_default();
        let images = options.images.unwrap_or_default();

        let count = self
            .bridge
            .count_chat_tokens(options.input_text.as_deref(), &images)
            .await?;
        Ok(json!({"count": count, "isChat": true}))
    }

    /// `getChatHistory`: no arguments. Resolves `{history: [...]}`.
    pub async fn get_chat_history(&self) -> Result<Value> {
        let history = self.bridge.get_chat_history().await?;
        Ok(json!({"history": history}))
    }

    fn emitter_sink(&self) -> EmitterSink {
        EmitterSink {
            emitter: Arc::clone(&self.emitter),
        }
    }
}

#[cfg(test)]
#[path = "plugin.test.rs"]
mod tests;
