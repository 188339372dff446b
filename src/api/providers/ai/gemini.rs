//! Google Gemini provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AiProvider;
use crate::api::error::ApiError;
use crate::config::AiConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const PROVIDER_NAME: &str = "gemini";

/// Gemini `generateContent` client
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a provider for `model` with the given API key
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_timeout(api_key, model, Duration::from_secs(60))
    }

    fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("metachecker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(PROVIDER_NAME, e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            client,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Build from config. `Ok(None)` when no API key is available.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, ApiError> {
        let Some(key) = config.resolved_api_key() else {
            return Ok(None);
        };

        let mut provider = Self::with_timeout(
            key,
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        if let Some(base_url) = &config.base_url {
            provider.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(Some(provider))
    }

    /// Create provider with a custom base URL (tests, proxies)
    pub fn new_with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let mut provider = Self::new(api_key, model)?;
        provider.base_url = base_url.into();
        Ok(provider)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        if !self.is_configured() {
            return Err(ApiError::not_configured(PROVIDER_NAME));
        }

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::network(PROVIDER_NAME, e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            401 => return Err(ApiError::unauthorized(PROVIDER_NAME)),
            403 => return Err(ApiError::forbidden(PROVIDER_NAME)),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok());
                return Err(ApiError::rate_limited(PROVIDER_NAME, retry_after));
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::http(PROVIDER_NAME, status, body));
            }
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(PROVIDER_NAME, e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.trim().is_empty());

        text.ok_or_else(|| ApiError::empty_response(PROVIDER_NAME))
    }
}
