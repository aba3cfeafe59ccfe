//! Generation service seam - prompt in, reply text out.
//!
//! The engine only depends on [`Generator`]; which model or service sits
//! behind it is a deployment choice. [`OllamaGenerator`] is the bundled
//! HTTP backend.

mod ollama;

pub use ollama::*;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Any failure to obtain a reply. The engine treats all variants alike.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("no reply within {0:?}")]
    Timeout(Duration),
}

/// A text-generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce a reply for a fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
