//! Language-model completion

pub mod client;
pub mod prompts;

use async_trait::async_trait;
pub use client::LlmClient;

use crate::errors::Result;

/// Produces generated text for a prompt
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
