//! HTTP client for the Gemini API.

use bytes::Bytes;
use futures::stream::Stream;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::GeminiError;
use crate::error::Result;
use crate::model::GenerativeModel;
use crate::sse::response_stream;
use crate::streaming::GenerateContentStream;
use crate::types::CountTokensRequest;
use crate::types::CountTokensResponse;
use crate::types::ErrorResponse;
use crate::types::GenerateContentRequest;
use crate::types::GenerateContentResponse;

/// Environment variable for the API key.
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The Gemini API client.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(GeminiError::Config("API key is required".to_string()));
        }

        let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Create a new client with the given API key and default configuration.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(api_key))
    }

    /// Create a new client using the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            GeminiError::Config(format!("Missing {API_KEY_ENV} environment variable"))
        })?;

        Self::new(ClientConfig::new(api_key))
    }

    /// Return a [`GenerativeModel`] handle bound to this client.
    pub fn generative_model(&self, name: impl Into<String>) -> GenerativeModel {
        GenerativeModel::new(self.clone(), name)
    }

    /// Build the URL for a model-scoped operation.
    ///
    /// Accepts model names with or without the `models/` prefix;
    /// percent-encodes the name either way.
    pub fn model_url(&self, model: &str, operation: &str) -> String {
        let name = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/{}/models/{}:{operation}",
            self.config.base_url,
            self.config.api_version,
            urlencoding::encode(name),
        )
    }

    /// Call `generateContent` for the given model.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.model_url(model, "generateContent");
        debug!(model, "generateContent request");
        self.post_json(&url, request).await
    }

    /// Call `streamGenerateContent` for the given model.
    ///
    /// The returned stream yields one [`GenerateContentResponse`] per
    /// server-sent event, in production order.
    pub async fn generate_content_stream(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentStream> {
        let url = format!(
            "{}?alt=sse",
            self.model_url(model, "streamGenerateContent")
        );
        debug!(model, "streamGenerateContent request");
        let bytes = self.post_stream(&url, request).await?;
        Ok(GenerateContentStream::new(response_stream(bytes)))
    }

    /// Call `countTokens` for the given model.
    pub async fn count_tokens(
        &self,
        model: &str,
        request: &CountTokensRequest,
    ) -> Result<CountTokensResponse> {
        let url = self.model_url(model, "countTokens");
        debug!(model, "countTokens request");
        self.post_json(&url, request).await
    }

    /// Default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|_| GeminiError::Config("API key contains invalid characters".to_string()))?;
        headers.insert(API_KEY_HEADER, key);
        Ok(headers)
    }

    /// Send a POST request and deserialize the JSON response.
    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .http_client
            .post(url)
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_api_error(status.as_u16(), &error_body));
        }

        let body_text = response.text().await?;
        serde_json::from_str(&body_text)
            .map_err(|e| GeminiError::Parse(format!("failed to parse response: {e}")))
    }

    /// Send a POST request and return the raw byte stream for SSE parsing.
    ///
    /// No retry logic: a streaming response cannot be transparently
    /// restarted.
    async fn post_stream(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<impl Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send + 'static>
    {
        let response = self
            .http_client
            .post(url)
            .headers(self.default_headers()?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(parse_api_error(status.as_u16(), &error_body));
        }

        Ok(response.bytes_stream())
    }
}

/// Parse an API error response body.
fn parse_api_error(status: u16, body: &str) -> GeminiError {
    if let Ok(envelope) = serde_json::from_str::<ErrorResponse>(body) {
        GeminiError::Api {
            code: envelope.error.code,
            message: envelope.error.message,
            status: envelope.error.status,
        }
    } else {
        GeminiError::Api {
            code: i32::from(status),
            message: body.to_string(),
            status: "UNKNOWN".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "client.test.rs"]
mod tests;
