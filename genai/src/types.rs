//! Wire types for the Gemini REST API.
//!
//! Field names follow the JSON schema of the `generateContent` /
//! `streamGenerateContent` / `countTokens` endpoints (camelCase on the
//! wire, SCREAMING_SNAKE_CASE enum values). Only the surface this crate
//! exercises is modeled; unknown response fields are ignored on
//! deserialization.

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// Safety Enums
// ============================================================================

/// Harm categories that can be filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    /// Category is unspecified.
    HarmCategoryUnspecified,
    /// Harassment content.
    HarmCategoryHarassment,
    /// Hate speech and content.
    HarmCategoryHateSpeech,
    /// Sexually explicit content.
    HarmCategorySexuallyExplicit,
    /// Dangerous content.
    HarmCategoryDangerousContent,
    /// Content that may harm civic integrity.
    HarmCategoryCivicIntegrity,
}

/// Thresholds above which content is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    /// Threshold is unspecified.
    HarmBlockThresholdUnspecified,
    /// Block low-probability content and above.
    BlockLowAndAbove,
    /// Block medium-probability content and above.
    BlockMediumAndAbove,
    /// Block only high-probability content.
    BlockOnlyHigh,
    /// Block nothing.
    BlockNone,
    /// Turn the filter off entirely.
    Off,
}

/// Probability that content falls into a harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmProbability {
    /// Probability is unspecified.
    HarmProbabilityUnspecified,
    /// Negligible probability.
    Negligible,
    /// Low probability.
    Low,
    /// Medium probability.
    Medium,
    /// High probability.
    High,
}

/// A safety setting constraining one harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySetting {
    /// The category this setting applies to.
    pub category: HarmCategory,

    /// The blocking threshold for the category.
    pub threshold: HarmBlockThreshold,
}

impl SafetySetting {
    /// Create a safety setting.
    pub fn new(category: HarmCategory, threshold: HarmBlockThreshold) -> Self {
        Self {
            category,
            threshold,
        }
    }
}

/// A safety rating attached to a prompt or candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SafetyRating {
    /// The rated category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<HarmCategory>,

    /// Probability of harm for the category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<HarmProbability>,

    /// Whether the content was blocked because of this rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
}

// ============================================================================
// Completion Enums
// ============================================================================

/// Reason the model stopped generating tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Reason is unspecified.
    FinishReasonUnspecified,
    /// Natural stop point or stop sequence hit.
    Stop,
    /// Maximum output token limit reached.
    MaxTokens,
    /// Candidate flagged for safety.
    Safety,
    /// Candidate flagged for recitation.
    Recitation,
    /// Unsupported language.
    Language,
    /// Unknown reason.
    Other,
    /// Token blocklist hit.
    Blocklist,
    /// Prohibited content.
    ProhibitedContent,
    /// Sensitive personally identifiable information.
    Spii,
    /// Malformed function call.
    MalformedFunctionCall,
    /// Generated image violated safety policies.
    ImageSafety,
    /// Model generated a tool call but none was enabled.
    UnexpectedToolCall,
}

/// Reason a prompt was blocked outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockedReason {
    /// Reason is unspecified.
    BlockedReasonUnspecified,
    /// Prompt blocked for safety.
    Safety,
    /// Blocked for another reason.
    Other,
    /// Terminology blocklist hit.
    Blocklist,
    /// Prohibited content.
    ProhibitedContent,
    /// Unsafe image input.
    ImageSafety,
}

// ============================================================================
// Content Types
// ============================================================================

/// Inline binary payload, base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// Raw bytes, base64 encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    /// IANA MIME type of the source data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Blob {
    /// Create a blob from already-encoded base64 data.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            mime_type: Some(mime_type.into()),
        }
    }

    /// Create a blob from raw bytes (base64 encodes them).
    pub fn from_bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        use base64::Engine;
        Self {
            data: Some(base64::engine::general_purpose::STANDARD.encode(data)),
            mime_type: Some(mime_type.into()),
        }
    }
}

/// One part of a content item: text or an inline blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Inline binary data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create an inline data part from raw bytes.
    pub fn from_bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            inline_data: Some(Blob::from_bytes(data, mime_type)),
            ..Default::default()
        }
    }
}

/// An ordered sequence of parts attributed to one producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Parts that constitute a single message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<Part>>,

    /// The producer of the content: `user` or `model`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Content {
    /// Create user content with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            parts: Some(vec![Part::text(text)]),
            role: Some("user".to_string()),
        }
    }

    /// Create model content with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            parts: Some(vec![Part::text(text)]),
            role: Some("model".to_string()),
        }
    }

    /// Create content with an explicit role and parts.
    pub fn with_parts(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            parts: Some(parts),
            role: Some(role.into()),
        }
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Generation parameters for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Nucleus sampling probability mass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    /// Top-k sampling cutoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,

    /// Maximum number of output tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,

    /// Sequences that stop generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

/// Request body for `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest first.
    pub contents: Vec<Content>,

    /// Generation parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,

    /// Safety settings for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
}

/// Request body for `countTokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensRequest {
    /// The content to count tokens for.
    pub contents: Vec<Content>,
}

// ============================================================================
// Response Types
// ============================================================================

/// A response candidate generated by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Safety ratings for the candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<SafetyRating>>,

    /// Index of the candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
}

/// Feedback about the prompt itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Why the prompt was blocked, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockedReason>,

    /// Safety ratings for the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_ratings: Option<Vec<SafetyRating>>,
}

/// Token usage reported with a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_token_count: Option<i32>,

    /// Tokens across all candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates_token_count: Option<i32>,

    /// Total tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<i32>,
}

/// Response from `generateContent`, or one chunk of a streamed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    /// Feedback about the prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// Model version that produced the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,

    /// Server-assigned response id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    ///
    /// Returns `None` when the response carries no text at all (for
    /// example a blocked prompt, or a streaming chunk bearing only usage
    /// metadata).
    pub fn text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.clone())
            .reduce(|acc, s| acc + &s)
    }

    /// The content of the first candidate, if any.
    pub fn content(&self) -> Option<&Content> {
        self.candidates.as_ref()?.first()?.content.as_ref()
    }

    /// The finish reason of the first candidate.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates.as_ref()?.first()?.finish_reason
    }

    /// The block reason from prompt feedback, if the prompt was blocked.
    pub fn block_reason(&self) -> Option<BlockedReason> {
        self.prompt_feedback.as_ref()?.block_reason
    }
}

/// Response from `countTokens`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    /// Total tokens in the submitted content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<i32>,
}

// ============================================================================
// Error Envelope
// ============================================================================

/// Error detail in an API error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP-like status code.
    #[serde(default)]
    pub code: i32,

    /// Human-readable message.
    #[serde(default)]
    pub message: String,

    /// Canonical status string, e.g. `INVALID_ARGUMENT`.
    #[serde(default)]
    pub status: String,
}

/// Top-level error envelope returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error detail.
    pub error: ApiError,
}

#[cfg(test)]
#[path = "types.test.rs"]
mod tests;
