//! CLI command handlers module
//!
//! This module is organized by functional domains:
//! - data: Scraping, indexing and the combined update
//! - chat: Single questions and the interactive RAG chat
//! - faq: FAQ extraction, generation and chat
//! - info: Information display (stats, config)

pub mod chat;
pub mod data;
pub mod faq;
pub mod info;

// Re-export all public handlers
pub use chat::*;
pub use data::*;
pub use faq::*;
pub use info::*;
