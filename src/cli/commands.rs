//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "owlrag")]
#[command(about = "Website chatbot: scrape a site, index it, and answer questions about it")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape sitemap pages that are not yet in the corpus
    Scrape,
    /// Embed corpus records that are not yet in the index
    Index,
    /// Scrape, then bring the index up to date
    Update,
    /// Answer a single question
    Ask {
        /// The question to answer
        question: String,
        /// Show retrieved passages and distances
        #[arg(long)]
        sources: bool,
    },
    /// Start the interactive chat (default command)
    Chat {
        /// Skip the scrape and index update before chatting
        #[arg(long)]
        no_update: bool,
    },
    /// FAQ mode commands
    #[command(subcommand)]
    Faq(FaqCommands),
    /// Show corpus, index and cache statistics
    Stats,
    /// Show current configuration
    Config,
}

#[derive(Subcommand)]
pub enum FaqCommands {
    /// Export tagged page text (H1/H2/H3/P lines) from every sitemap page
    Extract,
    /// Generate FAQ questions from the exported text
    Generate,
    /// Chat against the generated FAQs
    Chat,
}
