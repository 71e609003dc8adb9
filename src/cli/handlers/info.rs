//! Information display handlers (stats, config)

use crate::cli::output::print_config;
use crate::cli::output::print_warning;
use crate::corpus::CorpusStore;
use crate::faq::load_faqs;
use crate::index::EmbeddingIndex;
use crate::rag::ResponseCache;
use crate::AppConfig;
use crate::Result;

pub fn handle_stats_command(config: &AppConfig) -> Result<()> {
    let corpus = CorpusStore::open(config.corpus_path())?;
    let index = EmbeddingIndex::load(&config.index_path())?;
    let cache = ResponseCache::open(config.cache_path())?;
    let faqs = load_faqs(&config.faqs_path())?;

    println!("📊 owlrag Statistics");
    println!("===================");
    println!();
    println!("📄 Corpus: {} record(s)", corpus.len());
    match &index {
        Some(index) => {
            println!(
                "🧠 Index: {} vector(s), dimension {}, metric {:?}",
                index.len(),
                index.dimension(),
                index.metric()
            );
            println!(
                "  Watermark: {} | Updated: {}",
                index.watermark(),
                index.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        None => println!("🧠 Index: not built"),
    }
    println!("💬 Cached answers: {}", cache.len());
    println!("❓ FAQs: {}", faqs.len());

    let indexed = index.as_ref().map_or(0, EmbeddingIndex::watermark);
    if indexed < corpus.len() {
        println!();
        print_warning(&format!(
            "{} record(s) not yet indexed. Run: owlrag index",
            corpus.len() - indexed
        ));
    } else if indexed > corpus.len() {
        println!();
        print_warning("Index is ahead of the corpus; rebuild it by deleting the index file");
    }

    Ok(())
}

pub fn handle_config_command(config: &AppConfig) {
    print_config(config);
}
