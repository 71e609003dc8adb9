//! FAQ mode handlers

use tracing::info;

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::cli::shell::run_shell;
use crate::faq::generate_faqs;
use crate::faq::load_faqs;
use crate::faq::save_faqs;
use crate::faq::sectionize;
use crate::faq::FaqMatcher;
use crate::llm::LlmClient;
use crate::site::export_raw_text;
use crate::site::HttpFetcher;
use crate::AppConfig;
use crate::Result;

pub async fn handle_faq_extract_command(config: &AppConfig) -> Result<()> {
    let fetcher = HttpFetcher::from_scraper_config(&config.scraper)?;
    let path = config.raw_text_path();
    let lines = export_raw_text(&fetcher, &config.scraper, &path).await?;
    print_success(&format!(
        "Extracted {lines} line(s) to {}",
        path.display()
    ));
    Ok(())
}

pub async fn handle_faq_generate_command(config: &AppConfig) -> Result<()> {
    let raw_path = config.raw_text_path();
    let raw = match std::fs::read_to_string(&raw_path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            print_warning("No extracted text found. Run: owlrag faq extract");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let sections = sectionize(raw.lines());
    info!("Found {} section(s) in {}", sections.len(), raw_path.display());
    if sections.is_empty() {
        print_info("No sections with content; nothing to generate.");
        return Ok(());
    }

    let generator = LlmClient::from_app_config(config)?;
    let faqs = generate_faqs(&sections, &generator).await?;
    let faqs_path = config.faqs_path();
    save_faqs(&faqs_path, &faqs)?;
    print_success(&format!(
        "Generated {} FAQ(s) into {}",
        faqs.len(),
        faqs_path.display()
    ));
    Ok(())
}

pub async fn handle_faq_chat_command(config: &AppConfig) -> Result<()> {
    let mut matcher = FaqMatcher::new(load_faqs(&config.faqs_path())?);
    if matcher.is_empty() {
        print_warning("No FAQs found. Run: owlrag faq extract && owlrag faq generate");
    } else {
        info!("Loaded {} FAQ(s)", matcher.len());
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_shell(&mut matcher, stdin.lock(), &mut stdout, &config.chat).await?;
    Ok(())
}
