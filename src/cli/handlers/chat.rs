//! Question answering handlers: one-shot `ask` and the interactive chat

use std::sync::Arc;

use tracing::info;

use super::data::handle_update_command;
use crate::cli::output::print_info;
use crate::cli::output::print_sources;
use crate::cli::output::print_warning;
use crate::cli::shell::run_shell;
use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingClient;
use crate::index::EmbeddingIndex;
use crate::llm::LlmClient;
use crate::rag::AnswerSource;
use crate::rag::ChatService;
use crate::rag::ResponseCache;
use crate::rag::RetrievalSettings;
use crate::rag::Retriever;
use crate::AppConfig;
use crate::Result;

/// Load corpus, index and cache from the data directory and wire the clients
///
/// A missing index is treated as empty, so every question gets the
/// clarification message until `index` has been run.
pub fn open_chat_service(config: &AppConfig) -> Result<ChatService> {
    let corpus = CorpusStore::open(config.corpus_path())?;
    let index = match EmbeddingIndex::load(&config.index_path())? {
        Some(index) => index,
        None => {
            print_warning("No index found. Run: owlrag index");
            EmbeddingIndex::new(config.embedding_dimension(), config.retrieval.metric)
        }
    };
    info!(
        "Loaded {} record(s), {} vector(s)",
        corpus.len(),
        index.len()
    );

    let embedder = Arc::new(EmbeddingClient::from_app_config(config)?);
    let retriever = Retriever::new(
        index,
        corpus.load().to_vec(),
        embedder,
        RetrievalSettings::from_app_config(config),
    )?;
    let cache = ResponseCache::open(config.cache_path())?;
    let generator = Arc::new(LlmClient::from_app_config(config)?);

    Ok(ChatService::new(retriever, cache, generator))
}

pub async fn handle_ask_command(config: &AppConfig, question: &str, sources: bool) -> Result<()> {
    let mut service = open_chat_service(config)?;
    let answer = service.ask(question).await?;

    if answer.source == AnswerSource::Cache {
        if sources {
            print_info("Answer served from cache; no passages were retrieved.");
        }
        println!("(Cached Response)");
    } else if sources {
        print_sources(&answer.passages);
        println!();
    }
    println!("{}: {}", config.chat.bot_name, answer.text);
    Ok(())
}

pub async fn handle_chat_command(config: &AppConfig, no_update: bool) -> Result<()> {
    if !no_update {
        handle_update_command(config).await?;
        println!();
    }

    let mut service = open_chat_service(config)?;
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let summary = run_shell(&mut service, stdin.lock(), &mut stdout, &config.chat).await?;

    let stats = service.cache().stats();
    info!(
        "Chat ended: {} answered, {} failed, cache hit rate {:.0}%",
        summary.answered,
        summary.failed,
        stats.hit_rate() * 100.0
    );
    Ok(())
}
