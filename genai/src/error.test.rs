use super::*;

#[test]
fn test_api_error_display() {
    let err = GeminiError::Api {
        code: 400,
        message: "API key not valid".to_string(),
        status: "INVALID_ARGUMENT".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "API error 400 (INVALID_ARGUMENT): API key not valid"
    );
}

#[test]
fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err = GeminiError::from(json_err);
    assert!(matches!(err, GeminiError::Parse(_)));
    assert!(err.to_string().starts_with("parse error:"));
}

#[test]
fn test_config_error_display() {
    let err = GeminiError::Config("API key is required".to_string());
    assert_eq!(err.to_string(), "configuration error: API key is required");
}

#[test]
fn test_blocked_error_display() {
    let err = GeminiError::Blocked("SAFETY".to_string());
    assert_eq!(err.to_string(), "response blocked: SAFETY");
}
