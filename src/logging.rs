//! Logging configuration for owlrag

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::AppConfig;
use crate::Result;

const LOGS_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "owlrag.log";
const BACKTRACE_ENV: &str = "RUST_BACKTRACE";

/// Initialize console and file logging from the `[logging]` section
///
/// `level_override` (e.g. `--verbose`) wins over both `RUST_LOG` and the
/// configured level. With `backtrace = true`, `RUST_BACKTRACE=1` is exported
/// unless the variable is already set.
pub fn init_logging_with_config(config: &AppConfig, level_override: Option<&str>) -> Result<()> {
    let current = std::env::var(BACKTRACE_ENV).ok();
    if let Some(value) = backtrace_setting(config.logging.backtrace, current.as_deref()) {
        std::env::set_var(BACKTRACE_ENV, value);
    }

    let env_filter = match level_override {
        Some(level) => build_filter(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| build_filter(&config.logging.level)),
    };
    install(env_filter)?;

    let level = level_override.unwrap_or(config.logging.level.as_str());
    tracing::debug!("Logging initialized with level: {}", level);
    Ok(())
}

/// Initialize simple logging for testing
pub fn init_simple_logging() -> Result<()> {
    // A second init from another test is harmless
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init();
    Ok(())
}

fn backtrace_setting(enabled: bool, current: Option<&str>) -> Option<&'static str> {
    (enabled && current.is_none()).then_some("1")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,owlrag={level}"))
}

fn install(env_filter: EnvFilter) -> Result<()> {
    let logs_dir = Path::new(LOGS_DIR);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let file_appender = tracing_appender::rolling::daily(LOGS_DIR, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The interactive shell owns stdout, so console logs go to stderr
    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::OwlError::ConfigError(format!("Failed to init logging: {e}")))?;

    // Keep the background writer alive for the life of the process
    std::mem::forget(guard);

    Ok(())
}
