//! owlrag: a retrieval-augmented chatbot for a single website
//!
//! Pages listed in the site's sitemap are scraped into an append-only corpus,
//! embedded into a flat L2 index that is extended incrementally, and queried
//! with an adaptive number of neighbours before a language model answers.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod errors;
pub mod faq;
pub mod index;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod site;
pub mod storage;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
