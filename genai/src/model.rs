//! A configured generative model.

use crate::chat::Chat;
use crate::client::Client;
use crate::error::Result;
use crate::streaming::GenerateContentStream;
use crate::types::Content;
use crate::types::CountTokensRequest;
use crate::types::GenerateContentRequest;
use crate::types::GenerateContentResponse;
use crate::types::GenerationConfig;
use crate::types::SafetySetting;

/// A model name bound to one client, generation configuration and set of
/// safety settings. Immutable once built; cheap to clone.
#[derive(Debug, Clone)]
pub struct GenerativeModel {
    client: Client,
    name: String,
    generation_config: Option<GenerationConfig>,
    safety_settings: Option<Vec<SafetySetting>>,
}

impl GenerativeModel {
    /// Create a model handle with default generation behavior.
    pub fn new(client: Client, name: impl Into<String>) -> Self {
        Self {
            client,
            name: name.into(),
            generation_config: None,
            safety_settings: None,
        }
    }

    /// Set the generation configuration.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// Set the safety settings.
    pub fn with_safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = Some(settings);
        self
    }

    /// The model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generate a single completed response for the given contents.
    pub async fn generate_content(
        &self,
        contents: Vec<Content>,
    ) -> Result<GenerateContentResponse> {
        let request = self.build_request(contents);
        self.client.generate_content(&self.name, &request).await
    }

    /// Generate a streamed response for the given contents.
    pub async fn generate_content_stream(
        &self,
        contents: Vec<Content>,
    ) -> Result<GenerateContentStream> {
        let request = self.build_request(contents);
        self.client
            .generate_content_stream(&self.name, &request)
            .await
    }

    /// Count the tokens the given contents would occupy.
    pub async fn count_tokens(&self, contents: Vec<Content>) -> Result<i32> {
        let request = CountTokensRequest {
            contents,
        };
        let response = self.client.count_tokens(&self.name, &request).await?;
        Ok(response.total_tokens.unwrap_or(0))
    }

    /// Start a chat with empty history, bound to this model.
    pub fn start_chat(&self) -> Chat {
        Chat::new(self.clone())
    }

    /// Start a chat seeded with prior history, bound to this model.
    pub fn start_chat_with_history(&self, history: Vec<Content>) -> Chat {
        Chat::with_history(self.clone(), history)
    }

    fn build_request(&self, contents: Vec<Content>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents,
            generation_config: self.generation_config.clone(),
            safety_settings: self.safety_settings.clone(),
        }
    }
}

#[cfg(test)]
#[path = "model.test.rs"]
mod tests;
