use thiserror::Error;

#[derive(Error, Debug)]
pub enum OwlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Scrape error: {0}")]
    ScrapeError(String),

    #[error("Embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index out of sync with corpus: watermark {watermark} exceeds corpus size {corpus_len}")]
    IndexOutOfSync { watermark: usize, corpus_len: usize },
}

impl From<reqwest::Error> for OwlError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OwlError>;
