use serde::Deserialize;

use crate::domain::crag::CragConfig;
use crate::domain::ranking::RankerConfig;
use crate::domain::retrieval::RetrievalRoute;
use crate::infrastructure::llm::LlmProviderConfig;
use crate::infrastructure::services::RetrieverConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
    #[serde(default)]
    pub ranker: RankerConfig,
    #[serde(default)]
    pub refiner: CragConfig,
    #[serde(default)]
    pub llm: LlmProviderConfig,
    #[serde(default)]
    pub reranker: RerankerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Cross-encoder endpoint; without one the lexical overlap model is used
#[derive(Debug, Clone, Deserialize)]
pub struct RerankerConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_reranker_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_reranker_model() -> String {
    "bge-reranker-v2-m3".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for RerankerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: default_reranker_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Base URL of one source backend
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEndpoint {
    pub base_url: String,
}

/// Source backends; a missing entry leaves its route unregistered
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub library_holdings: Option<SourceEndpoint>,
    #[serde(default)]
    pub electronic_resources: Option<SourceEndpoint>,
    #[serde(default)]
    pub vector_index: Option<SourceEndpoint>,
    /// HTTP timeout for backend calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            library_holdings: None,
            electronic_resources: None,
            vector_index: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SourcesConfig {
    /// Routes with a configured backend, in canonical order
    pub fn configured_routes(&self) -> Vec<RetrievalRoute> {
        let mut routes = Vec::new();
        if self.library_holdings.is_some() {
            routes.push(RetrievalRoute::LibraryHoldings);
        }
        if self.electronic_resources.is_some() {
            routes.push(RetrievalRoute::ElectronicResources);
        }
        if self.vector_index.is_some() {
            routes.push(RetrievalRoute::VectorIndex);
        }
        routes
    }
}

impl AppConfig {
    /// Load `config/default`, then `config/local`, then `RETRIEVAL__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("RETRIEVAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
