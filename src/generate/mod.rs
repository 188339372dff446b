//! AI metadata generation
//!
//! Optionally fetches the page's current metadata, renders a prompt, asks the
//! provider for JSON, and merges the answer with what was fetched.

pub mod parse;
pub mod prompt;

pub use parse::{merge_with_existing, parse_generated, strip_code_fences};
pub use prompt::PromptBuilder;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

use crate::api::{AiProvider, ApiError};
use crate::metadata::{MetadataFetcher, MetadataRecord};

/// Errors from metadata generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("URL or prompt is required")]
    MissingInput,

    #[error("Gemini API key is not configured")]
    NotConfigured,

    #[error(transparent)]
    Provider(#[from] ApiError),

    #[error("Failed to parse AI response: {0}")]
    MalformedResponse(String),

    #[error("Failed to render prompt: {0}")]
    Template(String),
}

/// Generation input. At least one of `url` and `prompt` must be non-blank.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    fn prompt(&self) -> Option<&str> {
        non_blank(self.prompt.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Generates SEO metadata through an [`AiProvider`]
pub struct MetadataGenerator {
    fetcher: Arc<dyn MetadataFetcher>,
    provider: Option<Arc<dyn AiProvider>>,
    prompts: PromptBuilder,
}

impl MetadataGenerator {
    pub fn new(
        fetcher: Arc<dyn MetadataFetcher>,
        provider: Option<Arc<dyn AiProvider>>,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            fetcher,
            provider,
            prompts: PromptBuilder::new()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.provider
            .as_ref()
            .map(|p| p.is_configured())
            .unwrap_or(false)
    }

    pub async fn generate(&self, request: &GenerateRequest) -> Result<MetadataRecord, GenerateError> {
        let provider = match &self.provider {
            Some(p) if p.is_configured() => p,
            _ => return Err(GenerateError::NotConfigured),
        };

        let url = request.url();
        let description = request.prompt();
        if url.is_none() && description.is_none() {
            return Err(GenerateError::MissingInput);
        }

        let existing = match url {
            Some(url) => match self.fetcher.fetch(url).await {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(url, error = %e, "Fetch failed, generating from scratch");
                    None
                }
            },
            None => None,
        };

        let prompt = self.prompts.render(existing.as_ref(), description)?;
        tracing::info!(
            provider = provider.name(),
            from_existing = existing.is_some(),
            "Generating metadata"
        );

        let text = provider.generate(&prompt).await.map_err(|e| {
            if e.is_auth_error() {
                tracing::error!(provider = e.provider_name(), "AI provider rejected the API key");
            } else {
                tracing::warn!(provider = e.provider_name(), error = %e, "AI provider request failed");
            }
            e
        })?;
        let generated = parse_generated(&text)?;

        Ok(match &existing {
            Some(existing) => merge_with_existing(generated, existing),
            None => generated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FetchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubFetcher {
        result: Result<MetadataRecord, u16>,
    }

    #[async_trait]
    impl MetadataFetcher for StubFetcher {
        async fn fetch(&self, url: &str) -> Result<MetadataRecord, FetchError> {
            self.result.clone().map_err(|status| FetchError::Status {
                url: url.to_string(),
                status,
            })
        }
    }

    struct StubProvider {
        response: Result<String, ApiError>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AiProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response.clone()
        }
    }

    fn page() -> MetadataRecord {
        MetadataRecord {
            title: Some("Old".to_string()),
            og_image: Some("https://x.test/og.png".to_string()),
            robots_txt_exists: true,
            ..MetadataRecord::default()
        }
    }

    fn generator(
        fetch: Result<MetadataRecord, u16>,
        provider: Option<Arc<StubProvider>>,
    ) -> MetadataGenerator {
        MetadataGenerator::new(
            Arc::new(StubFetcher { result: fetch }),
            provider.map(|p| p as Arc<dyn AiProvider>),
        )
        .unwrap()
    }

    fn request(url: Option<&str>, prompt: Option<&str>) -> GenerateRequest {
        GenerateRequest {
            url: url.map(String::from),
            prompt: prompt.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_missing_input() {
        let gen = generator(Ok(page()), Some(StubProvider::replying("{}")));
        let err = gen.generate(&request(None, Some("  "))).await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingInput));
    }

    #[tokio::test]
    async fn test_not_configured() {
        let gen = generator(Ok(page()), None);
        assert!(!gen.is_configured());
        let err = gen
            .generate(&request(Some("x.test"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NotConfigured));
        assert_eq!(err.to_string(), "Gemini API key is not configured");
    }

    #[tokio::test]
    async fn test_generate_from_url_merges() {
        let provider = StubProvider::replying(r#"{"title":"New","ogTitle":"New OG"}"#);
        let gen = generator(Ok(page()), Some(provider.clone()));

        let record = gen.generate(&request(Some("x.test"), None)).await.unwrap();
        assert_eq!(record.title.as_deref(), Some("New"));
        assert_eq!(record.og_image.as_deref(), Some("https://x.test/og.png"));
        assert_eq!(record.discord_title.as_deref(), Some("New OG"));
        assert!(record.robots_txt_exists);

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("Current metadata:"));
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_prompt() {
        let provider = StubProvider::replying("```json\n{\"title\":\"Scratch\"}\n```");
        let gen = generator(Err(503), Some(provider.clone()));

        let record = gen
            .generate(&request(Some("down.test"), Some("A flower shop")))
            .await
            .unwrap();
        assert_eq!(record.title.as_deref(), Some("Scratch"));
        assert!(record.discord_title.is_none());

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("A flower shop"));
        assert!(!prompts[0].contains("Current metadata:"));
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(StubProvider {
            response: Err(ApiError::empty_response("stub")),
            prompts: Mutex::new(Vec::new()),
        });
        let gen = generator(Ok(page()), Some(provider));

        let err = gen.generate(&request(None, Some("shop"))).await.unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Provider(ApiError::EmptyResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let gen = generator(Ok(page()), Some(StubProvider::replying("not json")));
        let err = gen.generate(&request(None, Some("shop"))).await.unwrap_err();
        assert!(matches!(err, GenerateError::MalformedResponse(_)));
    }
}
