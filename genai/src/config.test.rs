use std::time::Duration;

use super::*;

#[test]
fn test_defaults() {
    let config = ClientConfig::new("test-key");
    assert_eq!(config.api_key, "test-key");
    assert_eq!(
        config.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.api_version, "v1beta");
    assert_eq!(config.timeout, Duration::from_secs(300));
}

#[test]
fn test_builder_overrides() {
    let config = ClientConfig::new("k")
        .base_url("http://127.0.0.1:8080")
        .api_version("v1")
        .timeout(Duration::from_secs(10));
    assert_eq!(config.base_url, "http://127.0.0.1:8080");
    assert_eq!(config.api_version, "v1");
    assert_eq!(config.timeout, Duration::from_secs(10));
}

#[test]
fn test_debug_redacts_api_key() {
    let config = ClientConfig::new("super-secret");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[REDACTED]"));
}
