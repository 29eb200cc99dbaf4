//! Content assembly and history marshaling.
//!
//! Inbound, loosely-typed turns (`ChatHistoryItem`) become vendor
//! `Content`; outbound vendor history becomes `HistoryEntry` values whose
//! parts serialize as `{type, content}` objects: raw text under
//! `"text"`, base64 blob data under its MIME type, or under
//! `"image/bitmap"` when no type was recorded.

use serde::Deserialize;
use serde::Serialize;
use serde::ser::SerializeStruct;

use geminix_genai::Content;
use geminix_genai::Part;

use crate::error::GeminiXError;
use crate::error::Result;
use crate::image;
use crate::image::ImageReference;
use crate::image::ResolvedImage;

/// Part type reported for blob data with no recorded MIME type.
const FALLBACK_BLOB_TYPE: &str = "image/bitmap";

/// One seed turn supplied to `init_chat`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistoryItem {
    /// `true` for a user turn, `false` for a model turn.
    pub is_user: bool,

    /// Text of the turn.
    #[serde(default)]
    pub text: Option<String>,

    /// Images attached to the turn.
    #[serde(default)]
    pub images: Option<Vec<ImageReference>>,
}

impl ChatHistoryItem {
    /// A text-only turn.
    pub fn text(is_user: bool, text: impl Into<String>) -> Self {
        Self {
            is_user,
            text: Some(text.into()),
            images: None,
        }
    }
}

/// Assemble vendor parts for one turn: the text part first when
/// non-empty, then one inline part per image, input order preserved.
pub fn build_parts(input_text: &str, images: &[ResolvedImage]) -> Vec<Part> {
    let mut parts = Vec::with_capacity(images.len() + 1);
    if !input_text.is_empty() {
        parts.push(Part::text(input_text));
    }
    for image in images {
        parts.push(Part::from_bytes(&image.bytes, image.mime_type.clone()));
    }
    parts
}

/// Convert one seed turn into vendor content, resolving its images.
pub fn history_item_to_content(item: &ChatHistoryItem) -> Result<Content> {
    let images = match &item.images {
        Some(references) => image::resolve_all(references)?,
        None => Vec::new(),
    };
    let parts = build_parts(item.text.as_deref().unwrap_or(""), &images);
    let role = if item.is_user { "user" } else { "model" };
    Ok(Content::with_parts(role, parts))
}

/// One marshaled history part.
///
/// Serializes as `{type, content}`; the variants are matched
/// exhaustively so an unrepresentable part is a compile error here, not
/// a silently dropped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryPart {
    /// Raw text.
    Text(String),

    /// Base64 data plus the MIME type it was recorded with, if any.
    Blob {
        /// Recorded MIME type; `None` reports as `image/bitmap`.
        mime_type: Option<String>,
        /// Base64-encoded payload.
        data: String,
    },
}

impl Serialize for HistoryPart {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("HistoryPart", 2)?;
        match self {
            HistoryPart::Text(text) => {
                state.serialize_field("type", "text")?;
                state.serialize_field("content", text)?;
            }
            HistoryPart::Blob { mime_type, data } => {
                state.serialize_field("type", mime_type.as_deref().unwrap_or(FALLBACK_BLOB_TYPE))?;
                state.serialize_field("content", data)?;
            }
        }
        state.end()
    }
}

/// One marshaled history turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// `true` when the turn's role was `user`.
    pub is_user: bool,

    /// Marshaled parts, vendor order preserved.
    pub parts: Vec<HistoryPart>,
}

/// Marshal one vendor content item into a history entry.
pub fn content_to_history_entry(content: &Content) -> Result<HistoryEntry> {
    let mut parts = Vec::new();
    for part in content.parts.as_deref().unwrap_or_default() {
        parts.push(vendor_part_to_history_part(part)?);
    }
    Ok(HistoryEntry {
        is_user: content.role.as_deref() == Some("user"),
        parts,
    })
}

fn vendor_part_to_history_part(part: &Part) -> Result<HistoryPart> {
    if let Some(text) = &part.text {
        return Ok(HistoryPart::Text(text.clone()));
    }
    if let Some(blob) = &part.inline_data {
        return Ok(HistoryPart::Blob {
            mime_type: blob.mime_type.clone(),
            data: blob.data.clone().unwrap_or_default(),
        });
    }
    Err(GeminiXError::InvalidArgument(
        "history part carries neither text nor inline data".to_string(),
    ))
}

#[cfg(test)]
#[path = "content.test.rs"]
mod tests;
