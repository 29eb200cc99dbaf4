//! Image reference resolution.
//!
//! References are resolved to bytes at call time and never persisted;
//! history replays re-resolve from the original URI. PNG and JPEG bytes
//! travel to the vendor untouched. Anything else that decodes is
//! re-encoded as JPEG at quality 80.

use std::path::Path;

use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use serde::Deserialize;
use tracing::debug;

use crate::error::GeminiXError;
use crate::error::Result;

/// Quality used when re-encoding to JPEG (the 0.8 compression factor).
const JPEG_QUALITY: u8 = 80;

/// MIME types the vendor accepts inline without transcoding.
const INLINE_MIME_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

/// A caller-supplied image: a URI plus an optional explicit MIME type
/// that overrides inference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReference {
    /// Filesystem path or `file://` URL.
    pub uri: String,

    /// Explicit MIME type; taken verbatim when present.
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl ImageReference {
    /// Reference an image by URI, MIME type inferred.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: None,
        }
    }

    /// Set an explicit MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// An image resolved to bytes with a definite MIME type, ready for
/// inline transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Encoded image bytes.
    pub bytes: Vec<u8>,

    /// MIME type describing `bytes`.
    pub mime_type: String,
}

/// Resolve a reference to transport-ready bytes.
///
/// An unreadable URI fails with [`GeminiXError::ImageResolution`]; bytes
/// that cannot be decoded or typed fail with
/// [`GeminiXError::UnsupportedMimeType`].
pub fn resolve(reference: &ImageReference) -> Result<ResolvedImage> {
    let path = strip_file_scheme(&reference.uri);
    let bytes = std::fs::read(path).map_err(|source| GeminiXError::ImageResolution {
        uri: reference.uri.clone(),
        reason: source.to_string(),
    })?;

    let mime_type = effective_mime_type(reference, path, &bytes);
    debug!(uri = %reference.uri, mime_type = ?mime_type, "resolved image bytes");

    match mime_type {
        Some(mime) if INLINE_MIME_TYPES.contains(&mime.as_str()) => Ok(ResolvedImage {
            bytes,
            mime_type: mime,
        }),
        other => reencode_as_jpeg(&bytes, other),
    }
}

/// Resolve every reference in order, failing on the first bad one.
pub fn resolve_all(references: &[ImageReference]) -> Result<Vec<ResolvedImage>> {
    references.iter().map(resolve).collect()
}

fn strip_file_scheme(uri: &str) -> &Path {
    Path::new(uri.strip_prefix("file://").unwrap_or(uri))
}

/// Explicit MIME type verbatim, else sniffed from the bytes, else
/// guessed from the path extension.
fn effective_mime_type(reference: &ImageReference, path: &Path, bytes: &[u8]) -> Option<String> {
    if let Some(mime) = &reference.mime_type {
        return Some(mime.clone());
    }
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type().to_string());
    }
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
}

fn reencode_as_jpeg(bytes: &[u8], mime_type: Option<String>) -> Result<ResolvedImage> {
    let unsupported = || {
        GeminiXError::UnsupportedMimeType(
            mime_type
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
        )
    };

    let decoded = image::load_from_memory(bytes).map_err(|_| unsupported())?;

    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    encoder.encode_image(&decoded).map_err(|_| unsupported())?;

    Ok(ResolvedImage {
        bytes: buffer,
        mime_type: ImageFormat::Jpeg.to_mime_type().to_string(),
    })
}

#[cfg(test)]
#[path = "image.test.rs"]
mod tests;
