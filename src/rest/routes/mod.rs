//! Route handlers for the REST API.

pub mod generate;
pub mod health;
pub mod metadata;
pub mod wizard;
