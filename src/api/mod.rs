//! Clients for external AI services
//!
//! - Provider trait for text generation
//! - Error type shared by every provider

pub mod error;
pub mod providers;

pub use error::ApiError;
pub use providers::ai::{AiProvider, GeminiProvider};
