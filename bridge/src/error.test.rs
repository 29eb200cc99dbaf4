use super::*;

#[test]
fn test_state_error_messages_are_verbatim() {
    assert_eq!(
        GeminiXError::ModelNotInitialized.to_string(),
        "Model not initialized"
    );
    assert_eq!(
        GeminiXError::ChatNotInitialized.to_string(),
        "Chat not initialized"
    );
}

#[test]
fn test_display_formats() {
    let err = GeminiXError::InvalidArgument("safety category 'NOPE'".to_string());
    assert_eq!(err.to_string(), "invalid argument: safety category 'NOPE'");

    let err = GeminiXError::ImageResolution {
        uri: "/tmp/missing.png".to_string(),
        reason: "No such file or directory".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "failed to resolve image /tmp/missing.png: No such file or directory"
    );

    let err = GeminiXError::UnsupportedMimeType("application/pdf".to_string());
    assert_eq!(err.to_string(), "unsupported MIME type: application/pdf");
}

#[test]
fn test_vendor_error_display_is_passthrough() {
    let vendor = GeminiError::Api {
        code: 429,
        message: "quota exhausted".to_string(),
        status: "RESOURCE_EXHAUSTED".to_string(),
    };
    let err = GeminiXError::from(vendor);
    assert_eq!(
        err.to_string(),
        "API error 429 (RESOURCE_EXHAUSTED): quota exhausted"
    );
}

#[test]
fn test_is_state_error() {
    assert!(GeminiXError::ModelNotInitialized.is_state_error());
    assert!(GeminiXError::ChatNotInitialized.is_state_error());
    assert!(!GeminiXError::InvalidArgument("x".to_string()).is_state_error());
    assert!(
        !GeminiXError::Vendor(GeminiError::Config("bad".to_string())).is_state_error()
    );
}
