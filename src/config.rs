use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::index::DistanceMetric;
use crate::rag::AdmissionPolicy;

/// Environment variable consulted when an API key is not set in the config file
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Remote service flavour used for embeddings and completions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Concurrent embedding requests during an index build (1 = strictly sequential)
    #[serde(default = "default_parallel_requests")]
    pub parallel_requests: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: Provider,
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_max_k")]
    pub max_k: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub metric: DistanceMetric,
    #[serde(default)]
    pub policy: AdmissionPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_sitemap_url")]
    pub sitemap_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_scrape_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_provider() -> Provider {
    Provider::OpenAI
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

pub(crate) fn default_dimension() -> usize {
    1536
}

pub(crate) fn default_parallel_requests() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    1000
}

pub(crate) fn default_max_k() -> usize {
    10
}

pub(crate) fn default_threshold() -> f32 {
    0.5
}

fn default_sitemap_url() -> String {
    "https://www.able.co/sitemap.xml".to_string()
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; MyScraperBot/1.0)".to_string()
}

pub(crate) fn default_tags() -> Vec<String> {
    ["h1", "h2", "h3", "p"].iter().map(ToString::to_string).collect()
}

fn default_scrape_timeout_secs() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bot_name() -> String {
    "Owl AI".to_string()
}

fn default_site_name() -> String {
    "Able".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, applying env fallbacks and validation
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::OwlError::ConfigError(
                "No config file found. Please create config.toml or config.example.toml"
                    .to_string(),
            ))
        }
    }

    /// Fill missing API keys from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if self.embeddings.api_key.is_none() {
                self.embeddings.api_key = Some(key.clone());
            }
            if self.llm.api_key.is_none() {
                self.llm.api_key = Some(key);
            }
        }
    }

    /// Reject settings the retrieval pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.retrieval.max_k == 0 {
            return Err(crate::OwlError::ConfigError(
                "retrieval.max_k must be at least 1".to_string(),
            ));
        }
        if !self.retrieval.threshold.is_finite() {
            return Err(crate::OwlError::ConfigError(
                "retrieval.threshold must be a finite number".to_string(),
            ));
        }
        if self.embeddings.dimension == 0 {
            return Err(crate::OwlError::ConfigError(
                "embeddings.dimension must be at least 1".to_string(),
            ));
        }
        if self.embeddings.parallel_requests == 0 {
            return Err(crate::OwlError::ConfigError(
                "embeddings.parallel_requests must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("scraper.sitemap_url", &self.scraper.sitemap_url),
            ("embeddings.endpoint", &self.embeddings.endpoint),
            ("llm.endpoint", &self.llm.endpoint),
        ] {
            url::Url::parse(value).map_err(|e| {
                crate::OwlError::ConfigError(format!("{name} is not a valid URL ({value}): {e}"))
            })?;
        }
        Ok(())
    }

    /// Get data directory
    pub fn data_dir(&self) -> &Path {
        &self.storage.data_dir
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.storage.data_dir.join("corpus.json")
    }

    pub fn index_path(&self) -> PathBuf {
        self.storage.data_dir.join("index.json")
    }

    pub fn cache_path(&self) -> PathBuf {
        self.storage.data_dir.join("cache.json")
    }

    pub fn faqs_path(&self) -> PathBuf {
        self.storage.data_dir.join("faqs.json")
    }

    pub fn raw_text_path(&self) -> PathBuf {
        self.storage.data_dir.join("raw_text.txt")
    }

    /// Get embedding dimension
    pub fn embedding_dimension(&self) -> usize {
        self.embeddings.dimension
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.model
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            backtrace: true,
        }
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_openai_endpoint(),
            api_key: None,
            model: default_embedding_model(),
            dimension: default_dimension(),
            parallel_requests: default_parallel_requests(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_openai_endpoint(),
            api_key: None,
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_k: default_max_k(),
            threshold: default_threshold(),
            metric: DistanceMetric::default(),
            policy: AdmissionPolicy::default(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            sitemap_url: default_sitemap_url(),
            user_agent: default_user_agent(),
            tags: default_tags(),
            timeout_secs: default_scrape_timeout_secs(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            site_name: default_site_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            embeddings: EmbeddingsConfig::default(),
            llm: LlmConfig::default(),
            retrieval: RetrievalConfig::default(),
            scraper: ScraperConfig::default(),
            storage: StorageConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}
