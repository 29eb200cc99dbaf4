//! Rust client for the Google Generative Language (Gemini) REST API.
//!
//! The crate covers the generation surface of the API: one-shot content
//! generation, SSE streaming, token counting, and multi-turn chat with
//! client-side history.
//!
//! # Quick Start
//!
//! ```ignore
//! use geminix_genai::Client;
//! use geminix_genai::Content;
//!
//! let client = Client::from_env()?;
//! let model = client.generative_model("gemini-2.0-flash");
//!
//! let response = model.generate_content(vec![Content::user("Hello!")]).await?;
//! println!("{}", response.text().unwrap_or_default());
//! ```
//!
//! # Module Structure
//!
//! - [`client`] - HTTP transport and endpoint construction
//! - [`config`] - Client configuration (API key, base URL, timeouts)
//! - [`model`] - Model handle binding a name to generation settings
//! - [`chat`] - Multi-turn conversation with history recording
//! - [`streaming`] - Accumulating wrapper over the SSE response stream
//! - [`types`] - Request and response wire types
//! - [`error`] - Error type and result alias

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
mod sse;
pub mod streaming;
pub mod types;

pub use chat::Chat;
pub use client::Client;
pub use config::ClientConfig;
pub use error::GeminiError;
pub use error::Result;
pub use model::GenerativeModel;
pub use sse::ContentStream;
pub use streaming::GenerateContentStream;
pub use types::Blob;
pub use types::BlockedReason;
pub use types::Candidate;
pub use types::Content;
pub use types::CountTokensRequest;
pub use types::CountTokensResponse;
pub use types::FinishReason;
pub use types::GenerateContentRequest;
pub use types::GenerateContentResponse;
pub use types::GenerationConfig;
pub use types::HarmBlockThreshold;
pub use types::HarmCategory;
pub use types::Part;
pub use types::SafetySetting;
