//! Website scraping: sitemap → pages → corpus records
//!
//! Only URLs listed in the sitemap are fetched; links are not followed.

pub mod extract;
pub mod fetcher;
pub mod sitemap;

use std::path::Path;

pub use extract::extract_tagged;
pub use extract::page_content;
pub use fetcher::HttpFetcher;
pub use fetcher::PageFetcher;
pub use sitemap::sitemap_urls;
use tracing::info;
use tracing::warn;

use crate::config::ScraperConfig;
use crate::corpus::AppendOutcome;
use crate::corpus::CorpusStore;
use crate::errors::Result;
use crate::models::CorpusRecord;
use crate::models::TaggedText;
use crate::storage::WriteTransaction;

/// Summary of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeReport {
    /// URLs listed in the sitemap
    pub listed: usize,
    /// URLs skipped because the corpus already holds them
    pub already_stored: usize,
    /// Pages that failed, returned a non-success status, or had no text
    pub without_content: usize,
    pub outcome: AppendOutcome,
}

/// Sitemap URLs, or none when the sitemap itself is unavailable
pub async fn list_urls<F>(fetcher: &F, sitemap_url: &str) -> Result<Vec<String>>
where
    F: PageFetcher + ?Sized,
{
    match fetcher.fetch(sitemap_url).await? {
        Some(xml) => sitemap_urls(&xml),
        None => Ok(Vec::new()),
    }
}

/// Fetch one page and extract its tagged text; failures yield `None`
pub async fn scrape_page<F>(fetcher: &F, url: &str, tags: &[String]) -> Result<Option<Vec<TaggedText>>>
where
    F: PageFetcher + ?Sized,
{
    let html = match fetcher.fetch(url).await {
        Ok(Some(html)) => html,
        Ok(None) => return Ok(None),
        Err(e) => {
            warn!("Failed to fetch {}: {}", url, e);
            return Ok(None);
        }
    };
    let tagged = extract_tagged(&html, tags)?;
    Ok(if tagged.is_empty() { None } else { Some(tagged) })
}

/// Scrape sitemap pages not yet in the corpus and append them
pub async fn scrape_site<F>(
    fetcher: &F,
    config: &ScraperConfig,
    corpus: &mut CorpusStore,
) -> Result<ScrapeReport>
where
    F: PageFetcher + ?Sized,
{
    let urls = list_urls(fetcher, &config.sitemap_url).await?;
    info!("Sitemap lists {} URL(s)", urls.len());

    let mut already_stored = 0;
    let mut without_content = 0;
    let mut records = Vec::new();

    for url in &urls {
        if corpus.contains(url) {
            already_stored += 1;
            continue;
        }
        info!("Extracting from: {}", url);
        match scrape_page(fetcher, url, &config.tags).await? {
            Some(tagged) => records.push(CorpusRecord::new(url.as_str(), page_content(&tagged))),
            None => without_content += 1,
        }
    }

    let outcome = corpus.append_new(records)?;
    Ok(ScrapeReport {
        listed: urls.len(),
        already_stored,
        without_content,
        outcome,
    })
}

/// Write every sitemap page's tagged text as `TAG: text` lines
///
/// Returns the number of lines written. This is the input of FAQ extraction.
pub async fn export_raw_text<F>(fetcher: &F, config: &ScraperConfig, path: &Path) -> Result<usize>
where
    F: PageFetcher + ?Sized,
{
    let urls = list_urls(fetcher, &config.sitemap_url).await?;
    let mut lines = Vec::new();
    for url in &urls {
        info!("Extracting from: {}", url);
        if let Some(tagged) = scrape_page(fetcher, url, &config.tags).await? {
            lines.extend(tagged.iter().map(TaggedText::to_line));
        }
    }

    let mut tx = WriteTransaction::begin(path)?;
    tx.write_all(lines.join("\n").as_bytes())?;
    tx.commit()?;
    info!("Extracted raw text saved to {}", path.display());
    Ok(lines.len())
}
