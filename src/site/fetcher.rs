//! Page fetching

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use tracing::warn;

use crate::config::ScraperConfig;
use crate::errors::OwlError;
use crate::errors::Result;

/// Retrieves raw page bodies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Body of `url`, or `None` when the server answered with a non-success status
    async fn fetch(&self, url: &str) -> Result<Option<String>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| OwlError::HttpError(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn from_scraper_config(config: &ScraperConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.timeout_secs)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("Skipping {} ({})", url, response.status());
            return Ok(None);
        }

        Ok(Some(response.text().await?))
    }
}
