//! AI Provider trait and implementations
//!
//! A provider turns a prompt into free text. Gemini is the only
//! implementation; the trait is the seam the generator and tests use.

mod gemini;

pub use gemini::GeminiProvider;

use async_trait::async_trait;

use crate::api::error::ApiError;

/// Trait for generative AI text providers
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Check if the provider is configured (has API key)
    fn is_configured(&self) -> bool;

    /// Run one completion for `prompt` and return the response text
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}
