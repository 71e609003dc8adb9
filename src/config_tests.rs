//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::index::DistanceMetric;
    use crate::rag::AdmissionPolicy;

    // ====== Default Value Tests ======

    #[test]
    fn test_default_retrieval_settings() {
        let config = AppConfig::default();
        assert_eq!(config.retrieval.max_k, 10);
        assert!((config.retrieval.threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.retrieval.metric, DistanceMetric::L2);
        assert_eq!(config.retrieval.policy, AdmissionPolicy::ZeroAllowed);
    }

    #[test]
    fn test_default_paths_live_in_data_dir() {
        let config = AppConfig::default();
        assert_eq!(config.corpus_path(), std::path::Path::new("data/corpus.json"));
        assert_eq!(config.index_path(), std::path::Path::new("data/index.json"));
        assert_eq!(config.cache_path(), std::path::Path::new("data/cache.json"));
    }

    #[test]
    fn test_default_scraper_tags() {
        assert_eq!(default_tags(), vec!["h1", "h2", "h3", "p"]);
    }

    // ====== Parsing Tests ======

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.embedding_model(), "text-embedding-3-small");
        assert_eq!(config.embedding_dimension(), 1536);
        assert_eq!(config.llm_model(), "gpt-4o");
        assert_eq!(config.chat.bot_name, "Owl AI");
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
[embeddings]
provider = "ollama"
endpoint = "http://localhost:11434"
model = "nomic-embed-text"
dimension = 768

[retrieval]
max_k = 5
threshold = 0.8
metric = "squared_l2"
policy = "at_least_one"

[storage]
data_dir = "/tmp/owl"
"#;
        let config = AppConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.embeddings.provider, Provider::Ollama);
        assert_eq!(config.embedding_dimension(), 768);
        assert_eq!(config.retrieval.max_k, 5);
        assert_eq!(config.retrieval.metric, DistanceMetric::SquaredL2);
        assert_eq!(config.retrieval.policy, AdmissionPolicy::AtLeastOne);
        assert_eq!(config.data_dir(), std::path::Path::new("/tmp/owl"));
        // Untouched sections keep their defaults
        assert_eq!(config.llm.provider, Provider::OpenAI);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let toml = "[llm]\nprovider = \"mystery\"\n";
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    // ====== Validation Tests ======

    #[test]
    fn test_zero_max_k_is_rejected() {
        let toml = "[retrieval]\nmax_k = 0\n";
        let err = AppConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("max_k"));
    }

    #[test]
    fn test_zero_dimension_is_rejected() {
        let mut config = AppConfig::default();
        config.embeddings.dimension = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_parallel_requests_is_rejected() {
        let mut config = AppConfig::default();
        config.embeddings.parallel_requests = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_is_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sitemap_url_is_rejected() {
        let toml = "[scraper]\nsitemap_url = \"able.co/sitemap.xml\"\n";
        let err = AppConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("scraper.sitemap_url"));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig::default();
        std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.retrieval.max_k, config.retrieval.max_k);
        assert_eq!(loaded.scraper.sitemap_url, config.scraper.sitemap_url);
    }
}
