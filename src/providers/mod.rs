//! Upstream completion providers

pub mod openai;

// Re-export for convenience
pub use openai::OpenAiClient;

use async_trait::async_trait;
use crate::request::{ChatRequest, ChatResponse};

/// A text-completion provider. Exactly one call per attempt; the
/// broker owns retry and classification.
#[async_trait]
pub trait Upstream: Send + Sync
{   async fn chat_completion(
      &self
    , request: &ChatRequest
    ) -> Result<ChatResponse, crate::error::Error>;
}
