//! Source registry - maps routes to adapter instances

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::retrieval::RetrievalRoute;
use crate::domain::source::SourceAdapter;
use crate::domain::DomainError;

/// Registry of the source adapters available to the retriever
#[derive(Debug)]
pub struct SourceRegistry {
    adapters: RwLock<HashMap<RetrievalRoute, Arc<dyn SourceAdapter>>>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
        }
    }

    /// Register an adapter under its own route, replacing any previous one
    pub async fn register(&self, adapter: Arc<dyn SourceAdapter>) {
        let route = adapter.route();
        self.adapters.write().await.insert(route, adapter);
    }

    pub async fn get(&self, route: RetrievalRoute) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.read().await.get(&route).cloned()
    }

    /// Get an adapter, returning an error if the route is not registered
    pub async fn get_required(
        &self,
        route: RetrievalRoute,
    ) -> Result<Arc<dyn SourceAdapter>, DomainError> {
        self.get(route).await.ok_or_else(|| {
            DomainError::source(route.as_str(), "No adapter registered for route")
        })
    }

    pub async fn has_route(&self, route: RetrievalRoute) -> bool {
        self.adapters.read().await.contains_key(&route)
    }

    /// Registered routes in canonical order
    pub async fn routes(&self) -> Vec<RetrievalRoute> {
        let mut routes: Vec<RetrievalRoute> = self.adapters.read().await.keys().copied().collect();
        routes.sort();
        routes
    }

    pub async fn count(&self) -> usize {
        self.adapters.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::source::MockSourceAdapter;

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = SourceRegistry::new();
        registry
            .register(Arc::new(MockSourceAdapter::new(RetrievalRoute::VectorIndex)))
            .await;

        assert!(registry.has_route(RetrievalRoute::VectorIndex).await);
        assert!(registry.get(RetrievalRoute::VectorIndex).await.is_some());
        assert!(registry.get(RetrievalRoute::LibraryHoldings).await.is_none());
    }

    #[tokio::test]
    async fn test_get_required_unregistered() {
        let registry = SourceRegistry::new();

        let result = registry.get_required(RetrievalRoute::ElectronicResources).await;

        assert!(matches!(result, Err(DomainError::Source { .. })));
    }

    #[tokio::test]
    async fn test_routes_sorted() {
        let registry = SourceRegistry::new();
        for route in [
            RetrievalRoute::VectorIndex,
            RetrievalRoute::LibraryHoldings,
            RetrievalRoute::ElectronicResources,
        ] {
            registry.register(Arc::new(MockSourceAdapter::new(route))).await;
        }

        assert_eq!(registry.count().await, 3);
        assert_eq!(registry.routes().await, RetrievalRoute::all().to_vec());
    }

    #[tokio::test]
    async fn test_register_replaces() {
        let registry = SourceRegistry::new();
        registry
            .register(Arc::new(MockSourceAdapter::new(RetrievalRoute::VectorIndex)))
            .await;
        registry
            .register(Arc::new(
                MockSourceAdapter::new(RetrievalRoute::VectorIndex).with_healthy(false),
            ))
            .await;

        let adapter = registry.get_required(RetrievalRoute::VectorIndex).await.unwrap();

        assert_eq!(registry.count().await, 1);
        assert!(!adapter.health_check().await.unwrap());
    }
}
