//! Search executor - runs the retrieval pipeline for one request

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::ranker::Ranker;
use super::refiner::Refiner;
use super::retriever::Retriever;
use crate::domain::retrieval::{
    RetrievalMetadata, RetrievalResult, RetrievalRoute, SearchRequest,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_pipeline_run;

/// Pipeline coordinator owning one retriever, ranker and refiner
#[derive(Debug)]
pub struct SearchExecutor {
    retriever: Retriever,
    ranker: Ranker,
    refiner: Refiner,
}

impl SearchExecutor {
    pub fn new(retriever: Retriever, ranker: Ranker, refiner: Refiner) -> Self {
        Self {
            retriever,
            ranker,
            refiner,
        }
    }

    /// Run retrieval, ranking and refinement for one request.
    ///
    /// Only an invalid request is an error; source, reranker and judgment
    /// failures are recovered and reported in the result metadata.
    pub async fn execute(&self, request: &SearchRequest) -> Result<RetrievalResult, DomainError> {
        let request_id = Uuid::new_v4().to_string();
        let span = info_span!("retrieval", request_id = %request_id);

        async {
            if let Err(e) = request.validate() {
                warn!(error = %e, "Rejected search request");
                return Err(DomainError::from(e));
            }

            Ok(self.run(request, request_id).await)
        }
        .instrument(span)
        .await
    }

    /// Per-source health
    pub async fn health_check(&self) -> BTreeMap<RetrievalRoute, bool> {
        self.retriever.health_check().await
    }

    async fn run(&self, request: &SearchRequest, request_id: String) -> RetrievalResult {
        let started = Instant::now();

        let retrieval = self.retriever.retrieve(request).await;
        let total_retrieved = retrieval.documents.len();
        let all_sources_failed = retrieval.all_sources_failed();

        let ranking = self
            .ranker
            .rank(&request.user_query, retrieval.documents)
            .await;
        let after_rerank = ranking.documents.len();

        let refinement = self
            .refiner
            .refine(&request.user_query, ranking.documents)
            .await;
        let documents = refinement.documents;
        let judgments = refinement.judgments;
        let refiner_escalates = refinement.needs_web_search;

        let insufficient_data = total_retrieved == 0;
        let needs_web_search = refiner_escalates || insufficient_data;

        let sources_used: Vec<RetrievalRoute> = documents
            .iter()
            .filter_map(|doc| doc.source)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let elapsed = started.elapsed();
        record_pipeline_run(elapsed, needs_web_search);

        let metadata = RetrievalMetadata {
            request_id,
            completed_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
            total_retrieved,
            after_dedup: ranking.after_dedup,
            after_rerank,
            after_crag: documents.len(),
            sources_used,
            sources_attempted: retrieval.sources_attempted,
            failed_sources: retrieval.failed_sources,
            judgment_summary: refinement.summary,
            fusion_method: self.ranker.config().fusion_method,
            all_sources_failed,
            insufficient_data,
        };

        if all_sources_failed {
            warn!("All sources failed, returning an empty result");
        }

        info!(
            total_retrieved = metadata.total_retrieved,
            after_dedup = metadata.after_dedup,
            after_rerank = metadata.after_rerank,
            after_crag = metadata.after_crag,
            elapsed_ms = metadata.elapsed_ms,
            needs_web_search = needs_web_search,
            "Retrieval pipeline complete"
        );

        RetrievalResult {
            documents,
            judgments,
            metadata,
            needs_web_search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use super::super::retriever::RetrieverConfig;
    use crate::domain::crag::{CragConfig, MockRelevanceJudge, RelevanceLabel};
    use crate::domain::ranking::{FusionMethod, MockRelevanceModel, RankerConfig};
    use crate::domain::retrieval::{Document, SearchQueries};
    use crate::domain::source::{ExecutionLane, MockSourceAdapter};
    use crate::infrastructure::sources::SourceRegistry;

    fn docs(prefix: &str, count: usize) -> Vec<Document> {
        (0..count)
            .map(|i| Document::new(format!("{} {}", prefix, i), 1.0 / (i as f32 + 1.0)))
            .collect()
    }

    fn request(routes: Vec<RetrievalRoute>) -> SearchRequest {
        SearchRequest::new(SearchQueries::new("정의론"), routes, "롤스 정의론 해설서 추천")
    }

    async fn executor(adapters: Vec<MockSourceAdapter>, judge: MockRelevanceJudge) -> SearchExecutor {
        let registry = Arc::new(SourceRegistry::new());
        for adapter in adapters {
            registry.register(Arc::new(adapter)).await;
        }

        SearchExecutor::new(
            Retriever::new(registry, RetrieverConfig::default()),
            Ranker::new(
                Arc::new(MockRelevanceModel::new().with_default_score(0.5)),
                RankerConfig::default().with_fusion_method(FusionMethod::CrossEncoder),
            ),
            Refiner::new(Arc::new(judge), CragConfig::default()),
        )
    }

    fn three_sources() -> Vec<MockSourceAdapter> {
        vec![
            MockSourceAdapter::new(RetrievalRoute::LibraryHoldings)
                .with_documents(docs("holdings", 3)),
            MockSourceAdapter::new(RetrievalRoute::ElectronicResources)
                .with_error("login failed"),
            MockSourceAdapter::new(RetrievalRoute::VectorIndex)
                .with_lane(ExecutionLane::Isolated)
                .with_documents(docs("vector", 2)),
        ]
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_pipeline() {
        let executor = executor(three_sources(), MockRelevanceJudge::new()).await;

        let result = executor
            .execute(&request(RetrievalRoute::all().to_vec()))
            .await
            .unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(result.judgments.len(), 5);
        assert_eq!(
            result.metadata.sources_used,
            vec![RetrievalRoute::LibraryHoldings, RetrievalRoute::VectorIndex]
        );
        assert_eq!(result.metadata.failed_sources.len(), 1);
        assert_eq!(
            result.metadata.failed_sources[0].source,
            RetrievalRoute::ElectronicResources
        );
        assert!(!result.metadata.all_sources_failed);
        assert!(!result.needs_web_search);
    }

    #[tokio::test]
    async fn test_stage_counts() {
        let judge = MockRelevanceJudge::new()
            .with_outcome("holdings 0", RelevanceLabel::Incorrect, 0.9)
            .with_outcome("vector 1", RelevanceLabel::Ambiguous, 0.3);
        let mut adapters = three_sources();
        adapters.push(
            MockSourceAdapter::new(RetrievalRoute::ElectronicResources)
                .with_documents(vec![Document::new("HOLDINGS   0", 0.2)]),
        );
        let executor = executor(adapters, judge).await;

        let result = executor
            .execute(&request(RetrievalRoute::all().to_vec()))
            .await
            .unwrap();
        let metadata = &result.metadata;

        assert_eq!(metadata.total_retrieved, 6);
        assert_eq!(metadata.after_dedup, 5);
        assert_eq!(metadata.after_rerank, 5);
        assert_eq!(metadata.after_crag, 3);
        assert_eq!(metadata.judgment_summary.incorrect, 1);
        assert_eq!(metadata.fusion_method, FusionMethod::CrossEncoder);
        assert_eq!(metadata.sources_attempted.len(), 3);
        assert!(metadata.failed_sources.is_empty());
    }

    #[tokio::test]
    async fn test_judgment_summary_counts_failures() {
        let judge = MockRelevanceJudge::new()
            .with_failure("holdings 1", "rate limited")
            .with_outcome("vector 0", RelevanceLabel::Incorrect, 0.9);
        let executor = executor(three_sources(), judge).await;

        let result = executor
            .execute(&request(RetrievalRoute::all().to_vec()))
            .await
            .unwrap();
        let summary = &result.metadata.judgment_summary;

        assert_eq!(summary.total, 5);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.correct, 3);
        assert_eq!(result.metadata.after_crag, 3);
    }

    #[tokio::test]
    async fn test_empty_routes_rejected_before_retrieval() {
        let executor = executor(three_sources(), MockRelevanceJudge::new()).await;

        let result = executor.execute(&request(vec![])).await;

        assert!(result.unwrap_err().is_rejection());
    }

    #[tokio::test]
    async fn test_all_sources_failing_returns_well_formed_result() {
        let executor = executor(
            vec![
                MockSourceAdapter::new(RetrievalRoute::LibraryHoldings).with_error("down"),
                MockSourceAdapter::new(RetrievalRoute::VectorIndex)
                    .with_lane(ExecutionLane::Isolated)
                    .with_error("index not loaded"),
            ],
            MockRelevanceJudge::new(),
        )
        .await;

        let result = executor
            .execute(&request(vec![
                RetrievalRoute::LibraryHoldings,
                RetrievalRoute::VectorIndex,
            ]))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(result.judgments.is_empty());
        assert!(result.metadata.all_sources_failed);
        assert!(result.metadata.insufficient_data);
        assert!(result.metadata.sources_used.is_empty());
        assert_eq!(result.metadata.failed_sources.len(), 2);
        assert!(result.needs_web_search);
    }

    #[tokio::test]
    async fn test_mostly_incorrect_judgments_escalate() {
        let judge = MockRelevanceJudge::new().with_default(RelevanceLabel::Incorrect, 0.9);
        let executor = executor(three_sources(), judge).await;

        let result = executor
            .execute(&request(RetrievalRoute::all().to_vec()))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.judgments.len(), 5);
        assert!(!result.metadata.insufficient_data);
        assert!(result.needs_web_search);
    }

    #[tokio::test]
    async fn test_health_check() {
        let executor = executor(three_sources(), MockRelevanceJudge::new()).await;

        let health = executor.health_check().await;

        assert_eq!(health.len(), 3);
        assert!(health.values().all(|healthy| *healthy));
    }
}
