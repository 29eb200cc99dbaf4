//! Model configuration bag and safety-setting mapping.
//!
//! Hosts describe a model with loosely-typed strings; this module is the
//! single place those strings become vendor enums. Unrecognized values are
//! rejected up front so a typo never reaches the vendor as a silently
//! defaulted setting.

use std::collections::BTreeMap;

use serde::Deserialize;

use geminix_genai::GenerationConfig;
use geminix_genai::HarmBlockThreshold;
use geminix_genai::HarmCategory;
use geminix_genai::SafetySetting;

use crate::error::GeminiXError;
use crate::error::Result;

/// Model configuration supplied to `init_model`.
///
/// Safety settings arrive as a category-string to threshold-string map;
/// a `BTreeMap` keeps the converted list in a stable order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    /// Vendor model name, e.g. `gemini-2.0-flash`.
    pub model_name: String,

    /// API key used for this model's client.
    pub api_key: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Top-k sampling cutoff.
    #[serde(default)]
    pub top_k: Option<i32>,

    /// Nucleus sampling probability mass.
    #[serde(default)]
    pub top_p: Option<f32>,

    /// Maximum number of output tokens.
    #[serde(default)]
    pub max_output_tokens: Option<i32>,

    /// Sequences that stop generation.
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,

    /// Harm category string mapped to block threshold string.
    #[serde(default)]
    pub safety_settings: Option<BTreeMap<String, String>>,
}

impl ModelParams {
    /// Minimal parameters: model name and API key only.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            api_key: api_key.into(),
            temperature: None,
            top_k: None,
            top_p: None,
            max_output_tokens: None,
            stop_sequences: None,
            safety_settings: None,
        }
    }

    /// Generation config for the vendor request, or `None` when no
    /// generation field was supplied.
    pub fn to_generation_config(&self) -> Option<GenerationConfig> {
        if self.temperature.is_none()
            && self.top_k.is_none()
            && self.top_p.is_none()
            && self.max_output_tokens.is_none()
            && self.stop_sequences.is_none()
        {
            return None;
        }

        Some(GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
            stop_sequences: self.stop_sequences.clone(),
        })
    }

    /// Convert the safety-setting strings into vendor settings.
    pub fn to_safety_settings(&self) -> Result<Option<Vec<SafetySetting>>> {
        let Some(map) = &self.safety_settings else {
            return Ok(None);
        };

        let mut settings = Vec::with_capacity(map.len());
        for (category, threshold) in map {
            settings.push(SafetySetting::new(
                harm_category_from_str(category)?,
                block_threshold_from_str(threshold)?,
            ));
        }
        Ok(Some(settings))
    }
}

/// Map a plugin harm-category string to the vendor enum.
pub fn harm_category_from_str(value: &str) -> Result<HarmCategory> {
    match value {
        "HARASSMENT" => Ok(HarmCategory::HarmCategoryHarassment),
        "HATE_SPEECH" => Ok(HarmCategory::HarmCategoryHateSpeech),
        "SEXUALLY_EXPLICIT" => Ok(HarmCategory::HarmCategorySexuallyExplicit),
        "DANGEROUS_CONTENT" => Ok(HarmCategory::HarmCategoryDangerousContent),
        "UNSPECIFIED" => Ok(HarmCategory::HarmCategoryUnspecified),
        other => Err(GeminiXError::InvalidArgument(format!(
            "{other} is not a valid harm category"
        ))),
    }
}

/// Map a plugin threshold string to the vendor enum.
pub fn block_threshold_from_str(value: &str) -> Result<HarmBlockThreshold> {
    match value {
        "NONE" => Ok(HarmBlockThreshold::BlockNone),
        "ONLY_HIGH" => Ok(HarmBlockThreshold::BlockOnlyHigh),
        "MEDIUM_AND_ABOVE" => Ok(HarmBlockThreshold::BlockMediumAndAbove),
        "LOW_AND_ABOVE" => Ok(HarmBlockThreshold::BlockLowAndAbove),
        "UNSPECIFIED" => Ok(HarmBlockThreshold::HarmBlockThresholdUnspecified),
        other => Err(GeminiXError::InvalidArgument(format!(
            "{other} is not a valid block threshold"
        ))),
    }
}

#[cfg(test)]
#[path = "params.test.rs"]
mod tests;
