//! Host-facing bridge for the Gemini API.
//!
//! The crate adapts a loosely-typed plugin surface (JSON argument bags,
//! a chunk event channel) to the typed client in `geminix-genai`. One
//! [`GeminiX`] holds the session state a host configures with
//! `initModel`/`initChat`; [`GeminiXPlugin`] wraps it with the JSON
//! parsing and event emission hosts speak.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use geminix_bridge::GeminiXPlugin;
//! use serde_json::json;
//!
//! let plugin = GeminiXPlugin::new(Arc::new(host_emitter));
//! plugin
//!     .init_model(json!({"params": {"modelName": "gemini-2.0-flash", "apiKey": key}}))
//!     .await?;
//! let resolution = plugin.send_message(json!({"inputText": "Hello!"})).await?;
//! ```
//!
//! # Module Structure
//!
//! - [`plugin`] - JSON argument bags, resolutions, and chunk events
//! - [`gemini`] - The typed operations behind the plugin surface
//! - [`params`] - Model configuration and safety-setting mapping
//! - [`content`] - Turn assembly and history marshaling
//! - [`image`] - Image reference resolution
//! - [`stream`] - Chunk forwarding with back-pressure
//! - [`error`] - Error type and result alias

pub mod content;
pub mod error;
pub mod gemini;
pub mod image;
pub mod params;
pub mod plugin;
mod session;
pub mod stream;

pub use content::ChatHistoryItem;
pub use content::HistoryEntry;
pub use content::HistoryPart;
pub use error::GeminiXError;
pub use error::Result;
pub use gemini::GeminiX;
pub use gemini::GeminiXConfig;
pub use image::ImageReference;
pub use image::ResolvedImage;
pub use params::ModelParams;
pub use plugin::EventEmitter;
pub use plugin::GeminiXPlugin;
pub use plugin::RESPONSE_CHUNK_EVENT;
pub use stream::ChunkSink;
pub use stream::CollectChunks;
