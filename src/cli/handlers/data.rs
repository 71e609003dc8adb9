//! Scrape and index handlers

use tracing::info;

use crate::cli::output::print_build_report;
use crate::cli::output::print_scrape_report;
use crate::corpus::CorpusStore;
use crate::embeddings::EmbeddingClient;
use crate::index::build_or_update;
use crate::index::BuildOptions;
use crate::index::BuildReport;
use crate::site::scrape_site;
use crate::site::HttpFetcher;
use crate::site::ScrapeReport;
use crate::AppConfig;
use crate::Result;

pub async fn handle_scrape_command(config: &AppConfig) -> Result<ScrapeReport> {
    let fetcher = HttpFetcher::from_scraper_config(&config.scraper)?;
    let mut corpus = CorpusStore::open(config.corpus_path())?;

    info!("Scraping {}", config.scraper.sitemap_url);
    let report = scrape_site(&fetcher, &config.scraper, &mut corpus).await?;
    print_scrape_report(&report);
    Ok(report)
}

pub async fn handle_index_command(config: &AppConfig) -> Result<BuildReport> {
    let corpus = CorpusStore::open(config.corpus_path())?;
    let embedder = EmbeddingClient::from_app_config(config)?;

    info!(
        "Indexing {} corpus record(s) with {}",
        corpus.len(),
        embedder.model()
    );
    let report = build_or_update(
        &config.index_path(),
        corpus.load(),
        &embedder,
        BuildOptions::from_app_config(config),
    )
    .await?;
    print_build_report(&report);
    Ok(report)
}

/// Scrape new pages, then embed whatever the index is missing
pub async fn handle_update_command(config: &AppConfig) -> Result<()> {
    handle_scrape_command(config).await?;
    handle_index_command(config).await?;
    println!("Document store updated!");
    Ok(())
}
