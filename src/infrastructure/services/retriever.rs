//! Retriever - fans a request out to the registered source adapters

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::retrieval::{Document, RetrievalRoute, SearchRequest, SourceFailure};
use crate::domain::source::{ExecutionLane, SourceAdapter};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_source_search, SourceStatus};
use crate::infrastructure::sources::SourceRegistry;

/// Configuration for the retriever
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Upper bound on one source's translate-and-search
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
}

fn default_source_timeout_secs() -> u64 {
    30
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            source_timeout_secs: default_source_timeout_secs(),
        }
    }
}

impl RetrieverConfig {
    pub fn with_source_timeout_secs(mut self, secs: u64) -> Self {
        self.source_timeout_secs = secs;
        self
    }
}

/// Concatenated source results plus the failures recovered along the way
#[derive(Debug, Clone, Default)]
pub struct RetrievalOutcome {
    /// Documents in request route order, tagged with provenance
    pub documents: Vec<Document>,
    pub sources_attempted: Vec<RetrievalRoute>,
    pub failed_sources: Vec<SourceFailure>,
}

impl RetrievalOutcome {
    /// Every attempted source failed
    pub fn all_sources_failed(&self) -> bool {
        !self.sources_attempted.is_empty()
            && self.failed_sources.len() == self.sources_attempted.len()
    }
}

/// Runs one search per route, isolating each source's failure
#[derive(Debug)]
pub struct Retriever {
    registry: Arc<SourceRegistry>,
    source_timeout: Duration,
}

impl Retriever {
    pub fn new(registry: Arc<SourceRegistry>, config: RetrieverConfig) -> Self {
        Self {
            registry,
            source_timeout: Duration::from_secs(config.source_timeout_secs),
        }
    }

    /// Override the per-source timeout
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<SourceRegistry> {
        &self.registry
    }

    /// Search every requested route and concatenate the results.
    ///
    /// Concurrent-lane adapters run together; isolated-lane adapters are
    /// awaited one by one after them. A failing source contributes nothing
    /// and is recorded in `failed_sources`.
    pub async fn retrieve(&self, request: &SearchRequest) -> RetrievalOutcome {
        let top_k = request.top_k as usize;

        let mut routes: Vec<RetrievalRoute> = Vec::with_capacity(request.routes.len());
        for route in &request.routes {
            if !routes.contains(route) {
                routes.push(*route);
            }
        }

        let mut results: HashMap<RetrievalRoute, Result<Vec<Document>, DomainError>> =
            HashMap::with_capacity(routes.len());
        let mut concurrent: Vec<Arc<dyn SourceAdapter>> = Vec::new();
        let mut isolated: Vec<Arc<dyn SourceAdapter>> = Vec::new();

        for &route in &routes {
            match self.registry.get(route).await {
                Some(adapter) => match adapter.execution_lane() {
                    ExecutionLane::Concurrent => concurrent.push(adapter),
                    ExecutionLane::Isolated => isolated.push(adapter),
                },
                None => {
                    warn!(source = route.as_str(), "No adapter registered for route");
                    record_source_search(route, SourceStatus::Unregistered, 0);
                    results.insert(
                        route,
                        Err(DomainError::source(route.as_str(), "No adapter registered for route")),
                    );
                }
            }
        }

        let concurrent_runs = join_all(
            concurrent
                .iter()
                .map(|adapter| self.run_source(adapter.as_ref(), request, top_k)),
        )
        .await;
        results.extend(concurrent_runs);

        for adapter in &isolated {
            let (route, result) = self.run_source(adapter.as_ref(), request, top_k).await;
            results.insert(route, result);
        }

        let mut outcome = RetrievalOutcome {
            sources_attempted: routes.clone(),
            ..Default::default()
        };

        for route in routes {
            match results.remove(&route) {
                Some(Ok(documents)) => outcome.documents.extend(documents),
                Some(Err(e)) => outcome
                    .failed_sources
                    .push(SourceFailure::new(route, e.to_string())),
                None => {}
            }
        }

        info!(
            attempted = outcome.sources_attempted.len(),
            failed = outcome.failed_sources.len(),
            documents = outcome.documents.len(),
            "Retrieval complete"
        );

        outcome
    }

    /// Per-source health; errors and timeouts report `false`
    pub async fn health_check(&self) -> BTreeMap<RetrievalRoute, bool> {
        let mut health = BTreeMap::new();
        let mut isolated = Vec::new();
        let mut checks = Vec::new();

        for route in self.registry.routes().await {
            let Some(adapter) = self.registry.get(route).await else {
                continue;
            };
            match adapter.execution_lane() {
                ExecutionLane::Concurrent => checks.push(adapter),
                ExecutionLane::Isolated => isolated.push(adapter),
            }
        }

        let results = join_all(checks.iter().map(|adapter| self.check_source(adapter.as_ref()))).await;
        health.extend(results);

        for adapter in &isolated {
            let (route, healthy) = self.check_source(adapter.as_ref()).await;
            health.insert(route, healthy);
        }

        health
    }

    async fn run_source(
        &self,
        adapter: &dyn SourceAdapter,
        request: &SearchRequest,
        top_k: usize,
    ) -> (RetrievalRoute, Result<Vec<Document>, DomainError>) {
        let route = adapter.route();
        let started = Instant::now();

        let result = match tokio::time::timeout(
            self.source_timeout,
            Self::search_source(adapter, request, top_k),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(
                format!("{} search", route),
                self.source_timeout.as_millis() as u64,
            )),
        };

        match &result {
            Ok(documents) => {
                debug!(
                    source = route.as_str(),
                    documents = documents.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Source search complete"
                );
                record_source_search(route, SourceStatus::Success, documents.len());
            }
            Err(e) => {
                warn!(source = route.as_str(), error = %e, "Source search failed");
                let status = match e {
                    DomainError::Timeout { .. } => SourceStatus::Timeout,
                    _ => SourceStatus::Error,
                };
                record_source_search(route, status, 0);
            }
        }

        (route, result)
    }

    async fn search_source(
        adapter: &dyn SourceAdapter,
        request: &SearchRequest,
        top_k: usize,
    ) -> Result<Vec<Document>, DomainError> {
        let route = adapter.route();
        let params = adapter.translate(request)?;
        let documents = adapter.search(params, top_k).await?;

        Ok(documents
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(index, document)| document.with_provenance(route, index + 1))
            .collect())
    }

    async fn check_source(&self, adapter: &dyn SourceAdapter) -> (RetrievalRoute, bool) {
        let route = adapter.route();
        let healthy = match tokio::time::timeout(self.source_timeout, adapter.health_check()).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(e)) => {
                warn!(source = route.as_str(), error = %e, "Source health check failed");
                false
            }
            Err(_) => {
                warn!(source = route.as_str(), "Source health check timed out");
                false
            }
        };

        (route, healthy)
    }
}
