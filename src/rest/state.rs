//! API state management for the REST server.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{AiProvider, GeminiProvider};
use crate::config::Config;
use crate::generate::MetadataGenerator;
use crate::metadata::{HttpMetadataFetcher, MetadataFetcher};

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// Application configuration
    pub config: Arc<Config>,
    /// Page metadata source
    pub fetcher: Arc<dyn MetadataFetcher>,
    /// AI generation pipeline (shares `fetcher`)
    pub generator: Arc<MetadataGenerator>,
}

impl ApiState {
    /// Create state with the HTTP fetcher and, if a key is available, Gemini
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn MetadataFetcher> = Arc::new(
            HttpMetadataFetcher::new(&config.fetch).context("Failed to build HTTP client")?,
        );

        let provider = GeminiProvider::from_config(&config.ai)
            .context("Failed to build Gemini client")?
            .map(|p| Arc::new(p) as Arc<dyn AiProvider>);
        if provider.is_none() {
            tracing::warn!("No Gemini API key configured; generation is disabled");
        }

        Self::with_services(config, fetcher, provider)
    }

    /// Create state from explicit services
    pub fn with_services(
        config: Config,
        fetcher: Arc<dyn MetadataFetcher>,
        provider: Option<Arc<dyn AiProvider>>,
    ) -> Result<Self> {
        let generator = MetadataGenerator::new(fetcher.clone(), provider)
            .context("Failed to build metadata generator")?;

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            generator: Arc::new(generator),
        })
    }

    pub fn ai_configured(&self) -> bool {
        self.generator.is_configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_state_without_key() {
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return;
        }
        let state = ApiState::new(Config::default()).unwrap();
        assert!(!state.ai_configured());
    }

    #[test]
    fn test_api_state_with_key() {
        let mut config = Config::default();
        config.ai.api_key = Some("AIzaTest".to_string());

        let state = ApiState::new(config).unwrap();
        assert!(state.ai_configured());
        assert_eq!(state.config.ai.model, "gemini-2.5-flash");
    }
}
