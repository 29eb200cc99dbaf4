//! Error types for the Gemini client.
//!
//! All fallible operations in this crate return [`Result`]. Source errors
//! from `reqwest` and `serde_json` are stored as strings so that
//! [`GeminiError`] stays `Clone` and cheap to move across stream
//! boundaries.

use thiserror::Error;

/// Errors produced by the Gemini client.
#[derive(Debug, Clone, Error)]
pub enum GeminiError {
    /// Client construction or configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),

    /// Structured error returned by the API.
    #[error("API error {code} ({status}): {message}")]
    Api {
        /// HTTP-like status code from the error envelope.
        code: i32,
        /// Human-readable message.
        message: String,
        /// Canonical status string, e.g. `INVALID_ARGUMENT`.
        status: String,
    },

    /// The request completed but the model produced no usable content,
    /// typically because the prompt or the response was blocked.
    #[error("response blocked: {0}")]
    Blocked(String),

    /// Response body or stream payload could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GeminiError {
    fn from(err: serde_json::Error) -> Self {
        GeminiError::Parse(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeminiError>;

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
