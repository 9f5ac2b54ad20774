//! Retrieval Pipeline
//!
//! Multi-source document retrieval for a library question-answering assistant:
//! - Fan-out over the holdings catalog, electronic resources and a vector index
//! - Deduplication, cross-encoder rescoring and rank fusion
//! - Corrective relevance judgment (CRAG) with web-search escalation

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use config::{RerankerConfig, SourcesConfig};
use domain::crag::{CragConfig, RelevanceJudge};
use domain::ranking::RelevanceModel;
use infrastructure::crag::{CachedRelevanceJudge, LlmRelevanceJudge};
use infrastructure::http_client::HttpClient;
use infrastructure::llm::{LlmProviderConfig, LlmProviderFactory};
use infrastructure::ranking::{HttpCrossEncoder, LexicalOverlapModel};
use infrastructure::services::{Ranker, Refiner, Retriever, SearchExecutor};
use infrastructure::sources::{
    ElectronicResourcesAdapter, HttpCatalogBackend, HttpVectorIndexClient,
    LibraryHoldingsAdapter, SourceRegistry, VectorIndexAdapter,
};

/// Build the search executor from configuration
pub async fn build_executor(config: &AppConfig) -> anyhow::Result<SearchExecutor> {
    let registry = Arc::new(build_registry(&config.sources).await?);
    let model = build_relevance_model(&config.reranker)?;
    let judge = build_relevance_judge(&config.llm, &config.refiner)?;

    let retriever = Retriever::new(registry, config.retriever.clone());
    let ranker = Ranker::new(model, config.ranker.clone());
    let refiner = Refiner::new(judge, config.refiner.clone());

    Ok(SearchExecutor::new(retriever, ranker, refiner))
}

/// Register an adapter for every configured source backend
pub async fn build_registry(config: &SourcesConfig) -> anyhow::Result<SourceRegistry> {
    let registry = SourceRegistry::new();
    let client = HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;

    if let Some(endpoint) = &config.library_holdings {
        let backend = Arc::new(HttpCatalogBackend::new(client.clone(), &endpoint.base_url));
        registry
            .register(Arc::new(LibraryHoldingsAdapter::new(backend)))
            .await;
    }

    if let Some(endpoint) = &config.electronic_resources {
        let backend = Arc::new(HttpCatalogBackend::new(client.clone(), &endpoint.base_url));
        registry
            .register(Arc::new(ElectronicResourcesAdapter::new(backend)))
            .await;
    }

    if let Some(endpoint) = &config.vector_index {
        let index = Arc::new(HttpVectorIndexClient::new(client, &endpoint.base_url));
        registry
            .register(Arc::new(VectorIndexAdapter::new(index)))
            .await;
    }

    info!(
        sources = registry.count().await,
        "Source registry initialized"
    );

    Ok(registry)
}

/// Cross-encoder when an endpoint is configured, lexical overlap otherwise
pub fn build_relevance_model(config: &RerankerConfig) -> anyhow::Result<Arc<dyn RelevanceModel>> {
    match &config.endpoint {
        Some(endpoint) => {
            let client =
                HttpClient::with_timeout(Duration::from_secs(config.request_timeout_secs))?;
            info!(endpoint = %endpoint, model = %config.model, "Using cross-encoder reranker");
            Ok(Arc::new(HttpCrossEncoder::new(client, endpoint, &config.model)))
        }
        None => {
            info!("No reranker endpoint configured, using lexical overlap");
            Ok(Arc::new(LexicalOverlapModel::new()))
        }
    }
}

/// LLM-backed judge, cached unless the cache capacity is zero
pub fn build_relevance_judge(
    llm: &LlmProviderConfig,
    config: &CragConfig,
) -> anyhow::Result<Arc<dyn RelevanceJudge>> {
    let provider = LlmProviderFactory::create(llm)?;
    let judge: Arc<dyn RelevanceJudge> =
        Arc::new(LlmRelevanceJudge::new(provider, config.clone()));

    if config.cache_capacity == 0 {
        return Ok(judge);
    }

    Ok(Arc::new(CachedRelevanceJudge::new(
        judge,
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceEndpoint;
    use crate::domain::retrieval::RetrievalRoute;

    fn endpoint(url: &str) -> Option<SourceEndpoint> {
        Some(SourceEndpoint {
            base_url: url.to_string(),
        })
    }

    #[tokio::test]
    async fn test_registry_only_holds_configured_sources() {
        let config = SourcesConfig {
            library_holdings: endpoint("http://localhost:8100"),
            vector_index: endpoint("http://localhost:8090"),
            ..Default::default()
        };

        let registry = build_registry(&config).await.unwrap();

        assert_eq!(
            registry.routes().await,
            vec![RetrievalRoute::LibraryHoldings, RetrievalRoute::VectorIndex]
        );
    }

    #[tokio::test]
    async fn test_empty_sources_config() {
        let registry = build_registry(&SourcesConfig::default()).await.unwrap();

        assert_eq!(registry.count().await, 0);
    }

    #[test]
    fn test_relevance_model_selection() {
        let lexical = build_relevance_model(&RerankerConfig::default()).unwrap();
        assert_eq!(lexical.model_name(), "lexical_overlap");

        let config = RerankerConfig {
            endpoint: Some("http://localhost:8081".to_string()),
            ..Default::default()
        };
        let cross_encoder = build_relevance_model(&config).unwrap();
        assert_eq!(cross_encoder.model_name(), "bge-reranker-v2-m3");
    }
}
