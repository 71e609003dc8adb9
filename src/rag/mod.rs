//! RAG (Retrieval-Augmented Generation) module
//!
//! This module provides the query-time half of the chatbot:
//! - Semantic retrieval over the flat embedding index
//! - Adaptive selection of how many neighbours are relevant
//! - Context assembly from retrieved passages
//! - A persistent response cache in front of answer generation
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use owlrag::config::AppConfig;
//! use owlrag::corpus::CorpusStore;
//! use owlrag::embeddings::EmbeddingClient;
//! use owlrag::index::EmbeddingIndex;
//! use owlrag::llm::LlmClient;
//! use owlrag::rag::ChatService;
//! use owlrag::rag::ResponseCache;
//! use owlrag::rag::RetrievalSettings;
//! use owlrag::rag::Retriever;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let corpus = CorpusStore::open(config.corpus_path())?;
//!     let index = EmbeddingIndex::load(&config.index_path())?.expect("run `owlrag index` first");
//!     let retriever = Retriever::new(
//!         index,
//!         corpus.load().to_vec(),
//!         Arc::new(EmbeddingClient::from_app_config(&config)?),
//!         RetrievalSettings::from_app_config(&config),
//!     )?;
//!     let cache = ResponseCache::open(config.cache_path())?;
//!     let mut chat = ChatService::new(retriever, cache, Arc::new(LlmClient::from_app_config(&config)?));
//!
//!     let answer = chat.ask("What does Able do?").await?;
//!     println!("Answer: {}", answer.text);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod context;
pub mod pipeline;
pub mod retriever;

pub use cache::ResponseCache;
pub use context::ContextAssembler;
pub use pipeline::AnswerSource;
pub use pipeline::ChatAnswer;
pub use pipeline::ChatService;
pub use retriever::admitted_count;
pub use retriever::AdmissionPolicy;
pub use retriever::ContextOutcome;
pub use retriever::RetrievalSettings;
pub use retriever::RetrievedPassage;
pub use retriever::Retriever;
