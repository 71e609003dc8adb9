use clap::Parser;
use owlrag::cli::handle_ask_command;
use owlrag::cli::handle_chat_command;
use owlrag::cli::handle_config_command;
use owlrag::cli::handle_faq_chat_command;
use owlrag::cli::handle_faq_extract_command;
use owlrag::cli::handle_faq_generate_command;
use owlrag::cli::handle_index_command;
use owlrag::cli::handle_scrape_command;
use owlrag::cli::handle_stats_command;
use owlrag::cli::handle_update_command;
use owlrag::cli::Cli;
use owlrag::cli::Commands;
use owlrag::cli::FaqCommands;
use owlrag::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    owlrag::logging::init_logging_with_config(&config, cli.verbose.then_some("debug"))?;
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command.unwrap_or(Commands::Chat { no_update: false }) {
        Commands::Scrape => {
            handle_scrape_command(&config).await?;
        }
        Commands::Index => {
            handle_index_command(&config).await?;
        }
        Commands::Update => handle_update_command(&config).await?,
        Commands::Ask { question, sources } => {
            handle_ask_command(&config, &question, sources).await?;
        }
        Commands::Chat { no_update } => handle_chat_command(&config, no_update).await?,
        Commands::Faq(faq_command) => match faq_command {
            FaqCommands::Extract => handle_faq_extract_command(&config).await?,
            FaqCommands::Generate => handle_faq_generate_command(&config).await?,
            FaqCommands::Chat => handle_faq_chat_command(&config).await?,
        },
        Commands::Stats => handle_stats_command(&config)?,
        Commands::Config => handle_config_command(&config),
    }

    Ok(())
}
