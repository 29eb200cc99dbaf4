use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

use super::*;

/// Bytes with a PNG magic header; resolution sniffs the type and passes
/// them through without decoding.
const PNG_MAGIC_FIXTURE: &[u8] = b"\x89PNG\r\n\x1a\nfixture";

fn resolved_png() -> ResolvedImage {
    ResolvedImage {
        bytes: b"abc".to_vec(),
        mime_type: "image/png".to_string(),
    }
}

#[test]
fn test_build_parts_text_first_then_images() {
    let parts = build_parts("describe this", &[resolved_png()]);

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].text.as_deref(), Some("describe this"));
    assert!(parts[0].inline_data.is_none());
    let blob = parts[1].inline_data.as_ref().unwrap();
    assert_eq!(blob.mime_type.as_deref(), Some("image/png"));
    assert_eq!(blob.data.as_deref(), Some("YWJj"));
}

#[test]
fn test_build_parts_omits_empty_text() {
    let parts = build_parts("", &[resolved_png()]);

    assert_eq!(parts.len(), 1);
    assert!(parts[0].inline_data.is_some());
}

#[test]
fn test_build_parts_preserves_image_order() {
    let first = ResolvedImage {
        bytes: b"one".to_vec(),
        mime_type: "image/png".to_string(),
    };
    let second = ResolvedImage {
        bytes: b"two".to_vec(),
        mime_type: "image/jpeg".to_string(),
    };

    let parts = build_parts("t", &[first, second]);

    assert_eq!(parts.len(), 3);
    let blobs: Vec<&str> = parts[1..]
        .iter()
        .map(|p| p.inline_data.as_ref().unwrap().mime_type.as_deref().unwrap())
        .collect();
    assert_eq!(blobs, vec!["image/png", "image/jpeg"]);
}

#[test]
fn test_history_item_roles() {
    let user = history_item_to_content(&ChatHistoryItem::text(true, "hello")).unwrap();
    assert_eq!(user.role.as_deref(), Some("user"));
    assert_eq!(user.parts.as_ref().unwrap()[0].text.as_deref(), Some("hello"));

    let model = history_item_to_content(&ChatHistoryItem::text(false, "hi there")).unwrap();
    assert_eq!(model.role.as_deref(), Some("model"));
}

#[test]
fn test_history_item_resolves_images() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("img.png");
    fs::write(&path, PNG_MAGIC_FIXTURE).unwrap();

    let item = ChatHistoryItem {
        is_user: true,
        text: Some("look".to_string()),
        images: Some(vec![ImageReference::new(path.to_string_lossy())]),
    };

    let content = history_item_to_content(&item).unwrap();
    let parts = content.parts.as_ref().unwrap();
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts[1].inline_data.as_ref().unwrap().mime_type.as_deref(),
        Some("image/png")
    );
}

#[test]
fn test_history_item_with_bad_image_fails() {
    let item = ChatHistoryItem {
        is_user: true,
        text: None,
        images: Some(vec![ImageReference::new("/missing/img.png")]),
    };

    let err = history_item_to_content(&item).unwrap_err();
    assert!(matches!(err, GeminiXError::ImageResolution { .. }));
}

#[test]
fn test_history_part_serialization() {
    let text = serde_json::to_value(HistoryPart::Text("hello".to_string())).unwrap();
    assert_eq!(text, json!({"type": "text", "content": "hello"}));

    let typed_blob = serde_json::to_value(HistoryPart::Blob {
        mime_type: Some("image/jpeg".to_string()),
        data: "YWJj".to_string(),
    })
    .unwrap();
    assert_eq!(typed_blob, json!({"type": "image/jpeg", "content": "YWJj"}));

    let untyped_blob = serde_json::to_value(HistoryPart::Blob {
        mime_type: None,
        data: "YWJj".to_string(),
    })
    .unwrap();
    assert_eq!(untyped_blob, json!({"type": "image/bitmap", "content": "YWJj"}));
}

#[test]
fn test_content_to_history_entry() {
    let content = Content::with_parts(
        "user",
        vec![Part::text("hello"), Part::from_bytes(b"abc", "image/png")],
    );

    let entry = content_to_history_entry(&content).unwrap();
    assert!(entry.is_user);
    assert_eq!(
        entry.parts,
        vec![
            HistoryPart::Text("hello".to_string()),
            HistoryPart::Blob {
                mime_type: Some("image/png".to_string()),
                data: "YWJj".to_string(),
            },
        ]
    );

    let model = content_to_history_entry(&Content::model("hi")).unwrap();
    assert!(!model.is_user);
}

#[test]
fn test_empty_vendor_part_is_invalid_argument() {
    let content = Content::with_parts("model", vec![Part::default()]);

    let err = content_to_history_entry(&content).unwrap_err();
    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
}

#[test]
fn test_history_entry_serializes_camel_case() {
    let entry = HistoryEntry {
        is_user: true,
        parts: vec![HistoryPart::Text("hello".to_string())],
    };

    assert_eq!(
        serde_json::to_value(&entry).unwrap(),
        json!({"isUser": true, "parts": [{"type": "text", "content": "hello"}]})
    );
}
