//! Error types for the bridge layer.
//!
//! Every failure a host-invocable method can produce is a variant here.
//! The `Display` output is the rejection message the host receives, so
//! the wording of each variant is part of the contract.

use thiserror::Error;

use geminix_genai::GeminiError;

/// Result type alias using GeminiXError.
pub type Result<T> = std::result::Result<T, GeminiXError>;

/// Errors that can occur in the bridge layer.
#[derive(Debug, Error)]
pub enum GeminiXError {
    /// A model-scoped call arrived before `init_model`.
    #[error("Model not initialized")]
    ModelNotInitialized,

    /// A chat-scoped call arrived before `init_chat`, or after the chat
    /// was invalidated by a model re-init.
    #[error("Chat not initialized")]
    ChatNotInitialized,

    /// An argument bag was malformed or carried an unrecognized value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An image URI could not be read.
    #[error("failed to resolve image {uri}: {reason}")]
    ImageResolution {
        /// The URI as the caller supplied it.
        uri: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Image bytes could not be decoded or typed for inline transport.
    #[error("unsupported MIME type: {0}")]
    UnsupportedMimeType(String),

    /// The vendor call itself failed.
    #[error("{0}")]
    Vendor(#[from] GeminiError),
}

impl GeminiXError {
    /// Whether this error represents missing session state rather than a
    /// bad request or vendor failure.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            GeminiXError::ModelNotInitialized | GeminiXError::ChatNotInitialized
        )
    }
}

#[cfg(test)]
#[path = "error.test.rs"]
mod tests;
