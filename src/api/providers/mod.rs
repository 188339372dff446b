//! Provider trait definitions for external service integrations

pub mod ai;

pub use ai::{AiProvider, GeminiProvider};
