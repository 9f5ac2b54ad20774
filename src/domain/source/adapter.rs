//! Source adapter capability trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::params::SourceParams;
use crate::domain::retrieval::{Document, RetrievalRoute, SearchRequest};
use crate::domain::DomainError;

/// How the retriever schedules an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionLane {
    /// Runs in the shared concurrent fan-out group
    #[default]
    Concurrent,
    /// Awaited on its own, never interleaved with the concurrent group
    Isolated,
}

/// Uniform search contract over one data source
#[async_trait]
pub trait SourceAdapter: Send + Sync + Debug {
    /// Route this adapter serves
    fn route(&self) -> RetrievalRoute;

    /// Stable source name used in logs and metadata
    fn source_name(&self) -> &'static str {
        self.route().as_str()
    }

    fn execution_lane(&self) -> ExecutionLane {
        ExecutionLane::Concurrent
    }

    /// Derive source-specific parameters from a request
    fn translate(&self, request: &SearchRequest) -> Result<SourceParams, DomainError>;

    /// Execute a search returning at most `top_k` documents
    async fn search(&self, params: SourceParams, top_k: usize)
        -> Result<Vec<Document>, DomainError>;

    /// Check that the underlying source is reachable and usable
    async fn health_check(&self) -> Result<bool, DomainError>;
}


#[cfg(test)]
mod tests {
    use super::mock::MockSourceAdapter;
    use super::*;
    use crate::domain::retrieval::SearchQueries;

    fn request() -> SearchRequest {
        SearchRequest::new(
            SearchQueries::new("rust"),
            vec![RetrievalRoute::LibraryHoldings],
            "books about rust",
        )
    }

    #[test]
    fn test_default_source_name_and_lane() {
        let adapter = MockSourceAdapter::new(RetrievalRoute::ElectronicResources);

        assert_eq!(adapter.source_name(), "electronic_resources");
        assert_eq!(adapter.execution_lane(), ExecutionLane::Concurrent);
    }

    #[tokio::test]
    async fn test_mock_adapter_caps_results() {
        let adapter = MockSourceAdapter::new(RetrievalRoute::LibraryHoldings).with_documents(vec![
            Document::new("a", 0.5),
            Document::new("b", 0.33),
            Document::new("c", 0.25),
        ]);

        let params = adapter.translate(&request()).unwrap();
        let docs = adapter.search(params, 2).await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(adapter.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_adapter_error() {
        let adapter = MockSourceAdapter::new(RetrievalRoute::LibraryHoldings).with_error("down");

        let params = adapter.translate(&request()).unwrap();
        let result = adapter.search(params, 5).await;

        assert!(matches!(result, Err(DomainError::Source { .. })));
    }
}
