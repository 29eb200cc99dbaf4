use serde_json::json;

use super::*;

#[test]
fn test_deserialize_full_bag() {
    let params: ModelParams = serde_json::from_value(json!({
        "modelName": "gemini-2.0-flash",
        "apiKey": "key-123",
        "temperature": 0.5,
        "topK": 40,
        "topP": 0.9,
        "maxOutputTokens": 1024,
        "stopSequences": ["END"],
        "safetySettings": {
            "HARASSMENT": "MEDIUM_AND_ABOVE",
            "DANGEROUS_CONTENT": "ONLY_HIGH"
        }
    }))
    .unwrap();

    assert_eq!(params.model_name, "gemini-2.0-flash");
    assert_eq!(params.api_key, "key-123");
    assert_eq!(params.top_k, Some(40));
    assert_eq!(params.stop_sequences, Some(vec!["END".to_string()]));
    assert_eq!(params.safety_settings.as_ref().unwrap().len(), 2);
}

#[test]
fn test_deserialize_minimal_bag() {
    let params: ModelParams = serde_json::from_value(json!({
        "modelName": "gemini-pro",
        "apiKey": "k"
    }))
    .unwrap();

    assert!(params.temperature.is_none());
    assert!(params.to_generation_config().is_none());
    assert_eq!(params.to_safety_settings().unwrap(), None);
}

#[test]
fn test_generation_config_built_when_any_field_set() {
    let mut params = ModelParams::new("gemini-pro", "k");
    params.max_output_tokens = Some(256);

    let config = params.to_generation_config().unwrap();
    assert_eq!(config.max_output_tokens, Some(256));
    assert_eq!(config.temperature, None);
}

#[test]
fn test_safety_settings_mapping() {
    let mut params = ModelParams::new("gemini-pro", "k");
    params.safety_settings = Some(BTreeMap::from([
        ("DANGEROUS_CONTENT".to_string(), "NONE".to_string()),
        ("HARASSMENT".to_string(), "LOW_AND_ABOVE".to_string()),
        ("HATE_SPEECH".to_string(), "UNSPECIFIED".to_string()),
        ("SEXUALLY_EXPLICIT".to_string(), "MEDIUM_AND_ABOVE".to_string()),
        ("UNSPECIFIED".to_string(), "ONLY_HIGH".to_string()),
    ]));

    let settings = params.to_safety_settings().unwrap().unwrap();
    assert_eq!(settings.len(), 5);

    // BTreeMap iteration order is lexicographic by category string.
    assert_eq!(settings[0].category, HarmCategory::HarmCategoryDangerousContent);
    assert_eq!(settings[0].threshold, HarmBlockThreshold::BlockNone);
    assert_eq!(settings[1].category, HarmCategory::HarmCategoryHarassment);
    assert_eq!(settings[1].threshold, HarmBlockThreshold::BlockLowAndAbove);
}

#[test]
fn test_low_and_above_maps_to_block_low_and_above() {
    assert_eq!(
        block_threshold_from_str("LOW_AND_ABOVE").unwrap(),
        HarmBlockThreshold::BlockLowAndAbove
    );
}

#[test]
fn test_unknown_category_is_invalid_argument() {
    let err = harm_category_from_str("DEROGATORY").unwrap_err();
    assert!(matches!(err, GeminiXError::InvalidArgument(_)));
    assert_eq!(
        err.to_string(),
        "invalid argument: DEROGATORY is not a valid harm category"
    );
}

#[test]
fn test_unknown_threshold_is_invalid_argument() {
    let err = block_threshold_from_str("SOMETIMES").unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument: SOMETIMES is not a valid block threshold"
    );
}

#[test]
fn test_bad_threshold_rejects_whole_conversion() {
    let mut params = ModelParams::new("gemini-pro", "k");
    params.safety_settings = Some(BTreeMap::from([
        ("HARASSMENT".to_string(), "NONE".to_string()),
        ("HATE_SPEECH".to_string(), "EXTREME".to_string()),
    ]));

    assert!(params.to_safety_settings().is_err());
}
