//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `owlrag` CLI

use crate::corpus::AppendOutcome;
use crate::index::BuildReport;
use crate::rag::RetrievedPassage;
use crate::site::ScrapeReport;
use crate::AppConfig;

/// Safely truncate a string at character boundary (not byte boundary)
///
/// # Returns
/// Truncated string with "..." suffix if truncated, otherwise the original string
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Hide all but the last four characters of a secret
#[must_use]
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret {
        None => "(not set)".to_string(),
        Some(s) if s.chars().count() <= 4 => "****".to_string(),
        Some(s) => {
            let tail: String = s.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{tail}")
        }
    }
}

pub fn print_scrape_report(report: &ScrapeReport) {
    let AppendOutcome {
        added,
        skipped,
        total,
    } = report.outcome;
    println!("🕸️  Sitemap URLs: {}", report.listed);
    println!("  Already stored: {}", report.already_stored);
    println!("  Without content: {}", report.without_content);
    if added > 0 {
        print_success(&format!("New data scraped and saved! ({added} added, {total} total)"));
    } else {
        print_info("No new data found.");
    }
    if skipped > 0 {
        println!("  Duplicates skipped: {skipped}");
    }
}

pub fn print_build_report(report: &BuildReport) {
    if report.created {
        print_success(&format!(
            "New index built with {} vector(s)",
            report.index.len()
        ));
    } else if report.embedded > 0 {
        print_success(&format!(
            "Index updated with {} new vector(s) ({} total)",
            report.embedded,
            report.index.len()
        ));
    } else {
        print_info("No new data to update the index.");
    }
}

/// Print retrieved passages, nearest first
pub fn print_sources(passages: &[RetrievedPassage]) {
    if passages.is_empty() {
        print_warning("No passage within the distance threshold");
        return;
    }
    println!("\n📚 Sources ({}):", passages.len());
    for (idx, p) in passages.iter().enumerate() {
        println!(
            "  {}. [{}] distance {:.4} | {} | \"{}\"",
            idx + 1,
            p.id,
            p.distance,
            p.record.source_id,
            truncate_str(&p.record.content, 60)
        );
    }
}

/// Print configuration
pub fn print_config(config: &AppConfig) {
    println!("📋 owlrag Configuration:");
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!("  Parallel requests: {}", config.embeddings.parallel_requests);
    println!("  Key: {}", mask_secret(config.embeddings.api_key.as_deref()));
    println!();

    println!("🤖 LLM:");
    println!("  Provider: {:?}", config.llm.provider);
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm_model());
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Max tokens: {}", config.llm.max_tokens);
    println!("  Key: {}", mask_secret(config.llm.api_key.as_deref()));
    println!();

    println!("🔍 Retrieval:");
    println!("  Max k: {}", config.retrieval.max_k);
    println!("  Threshold: {}", config.retrieval.threshold);
    println!("  Metric: {:?}", config.retrieval.metric);
    println!("  Policy: {:?}", config.retrieval.policy);
    println!();

    println!("🕸️  Scraper:");
    println!("  Sitemap: {}", config.scraper.sitemap_url);
    println!("  Tags: {}", config.scraper.tags.join(", "));
    println!();

    println!("💾 Storage:");
    println!("  Data dir: {}", config.data_dir().display());
}

/// Print colored output functions
pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}
