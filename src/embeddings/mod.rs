//! Embeddings generation module
//!
//! This module provides the [`Embedder`] seam used by the index builder and the
//! retriever, plus an HTTP implementation for two providers:
//! - OpenAI (text-embedding-3-small, text-embedding-ada-002, etc.)
//! - Ollama (local models)
//!
//! # Examples
//!
//! ```rust,no_run
//! use owlrag::config::AppConfig;
//! use owlrag::embeddings::Embedder;
//! use owlrag::embeddings::EmbeddingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_app_config(&config)?;
//!
//!     let embedding = client.embed("Hello, world!").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod text;

use async_trait::async_trait;
pub use client::EmbeddingClient;
pub use text::prepare_text;

use crate::errors::Result;

/// Turns text into a fixed-length vector
///
/// The same implementation (model and dimension) must be used to build the
/// index and to embed queries against it.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
