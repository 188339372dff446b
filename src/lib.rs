//! Metachecker - SEO metadata checking, AI generation and a four-step
//! review wizard
//!
//! The wizard core (`wizard`) is pure and synchronous. `metadata`, `generate`
//! and `rest` add page fetching, Gemini generation and the HTTP API.

pub mod api;
pub mod config;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod rest;
pub mod wizard;
