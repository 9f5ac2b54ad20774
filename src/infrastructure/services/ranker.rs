//! Ranker - dedup, pairwise rescoring and fusion

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ranking::{deduplicate, fuse, RankerConfig, RelevanceModel};
use crate::domain::retrieval::{Document, RankedDocument};

/// Ranked documents and the counts observed while producing them
#[derive(Debug, Clone, Default)]
pub struct RankingOutcome {
    pub documents: Vec<RankedDocument>,
    pub after_dedup: usize,
    /// False when the relevance model failed and native scores were used
    pub reranked: bool,
}

/// Turns the retriever's concatenated output into one bounded ordering
#[derive(Debug)]
pub struct Ranker {
    model: Arc<dyn RelevanceModel>,
    config: RankerConfig,
}

impl Ranker {
    pub fn new(model: Arc<dyn RelevanceModel>, config: RankerConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Deduplicate, score against `query`, then fuse with the configured strategy.
    ///
    /// A relevance model error or a score count that does not match the input
    /// falls back to each document's native score.
    pub async fn rank(&self, query: &str, documents: Vec<Document>) -> RankingOutcome {
        if documents.is_empty() {
            return RankingOutcome {
                reranked: true,
                ..Default::default()
            };
        }

        let retrieved = documents.len();
        let unique = deduplicate(documents);
        let after_dedup = unique.len();

        let texts: Vec<String> = unique.iter().map(|doc| doc.content.clone()).collect();
        let scores = match self.model.score(query, &texts).await {
            Ok(scores) if scores.len() == unique.len() => Some(scores),
            Ok(scores) => {
                warn!(
                    model = self.model.model_name(),
                    expected = unique.len(),
                    received = scores.len(),
                    "Relevance model returned a mismatched score count, using native scores"
                );
                None
            }
            Err(e) => {
                warn!(
                    model = self.model.model_name(),
                    error = %e,
                    "Relevance model failed, using native scores"
                );
                None
            }
        };

        let reranked = scores.is_some();
        let candidates: Vec<RankedDocument> = match scores {
            Some(scores) => unique
                .into_iter()
                .zip(scores)
                .map(|(doc, score)| RankedDocument::from_document(doc, score))
                .collect(),
            None => unique
                .into_iter()
                .map(|doc| {
                    let native = doc.score;
                    RankedDocument::from_document(doc, native)
                })
                .collect(),
        };

        let ranked = fuse(candidates, &self.config);

        info!(
            retrieved = retrieved,
            after_dedup = after_dedup,
            ranked = ranked.len(),
            fusion_method = self.config.fusion_method.as_str(),
            "Ranking complete"
        );

        RankingOutcome {
            documents: ranked,
            after_dedup,
            reranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ranking::{FusionMethod, MockRelevanceModel};
    use crate::domain::retrieval::RetrievalRoute;

    fn doc(content: &str, score: f32, source: RetrievalRoute, rank: usize) -> Document {
        Document::new(content, score).with_provenance(source, rank)
    }

    fn documents() -> Vec<Document> {
        vec![
            doc("A Theory of Justice", 1.0, RetrievalRoute::LibraryHoldings, 1),
            doc("Justice as Fairness", 0.5, RetrievalRoute::LibraryHoldings, 2),
            doc("a theory  of JUSTICE", 0.9, RetrievalRoute::VectorIndex, 1),
            doc("Political Liberalism", 0.8, RetrievalRoute::VectorIndex, 2),
        ]
    }

    fn model() -> MockRelevanceModel {
        MockRelevanceModel::new()
            .with_score_for("A Theory of Justice", 0.9)
            .with_score_for("Justice as Fairness", 0.7)
            .with_score_for("Political Liberalism", 0.95)
    }

    #[tokio::test]
    async fn test_empty_input() {
        let ranker = Ranker::new(Arc::new(model()), RankerConfig::default());

        let outcome = ranker.rank("justice", vec![]).await;

        assert!(outcome.documents.is_empty());
        assert_eq!(outcome.after_dedup, 0);
    }

    #[tokio::test]
    async fn test_cross_encoder_ordering_after_dedup() {
        let config = RankerConfig::default().with_fusion_method(FusionMethod::CrossEncoder);
        let ranker = Ranker::new(Arc::new(model()), config);

        let outcome = ranker.rank("justice", documents()).await;

        assert_eq!(outcome.after_dedup, 3);
        assert!(outcome.reranked);
        let contents: Vec<&str> = outcome.documents.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["Political Liberalism", "A Theory of Justice", "Justice as Fairness"]
        );
        assert_eq!(outcome.documents[0].rank, 1);
        assert_eq!(outcome.documents[2].rank, 3);
        assert_eq!(outcome.documents[1].original_score, 1.0);
    }

    #[tokio::test]
    async fn test_rrf_uses_native_ranks() {
        let ranker = Ranker::new(Arc::new(model()), RankerConfig::default());

        let outcome = ranker.rank("justice", documents()).await;

        // Equal native ranks keep input order
        let contents: Vec<&str> = outcome.documents.iter().map(|d| d.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["A Theory of Justice", "Justice as Fairness", "Political Liberalism"]
        );
        assert_eq!(outcome.documents[0].fused_score, 1.0 / 61.0);
    }

    #[tokio::test]
    async fn test_weighted_fusion() {
        let config = RankerConfig::default().with_fusion_method(FusionMethod::Weighted);
        let ranker = Ranker::new(Arc::new(model()), config);

        let outcome = ranker.rank("justice", documents()).await;

        assert_eq!(outcome.documents[0].content, "Political Liberalism");
        assert!((outcome.documents[0].fused_score - 0.95 * 0.6).abs() < 1e-6);
        assert!((outcome.documents[1].fused_score - 0.9 * 0.4).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_native_scores() {
        let config = RankerConfig::default().with_fusion_method(FusionMethod::CrossEncoder);
        let ranker = Ranker::new(
            Arc::new(MockRelevanceModel::new().with_error("connection refused")),
            config,
        );

        let outcome = ranker.rank("justice", documents()).await;

        assert!(!outcome.reranked);
        assert_eq!(outcome.documents.len(), 3);
        assert_eq!(outcome.documents[0].content, "A Theory of Justice");
        assert_eq!(outcome.documents[0].rerank_score, 1.0);
    }

    #[tokio::test]
    async fn test_score_count_mismatch_falls_back() {
        let ranker = Ranker::new(
            Arc::new(model().with_truncated_output()),
            RankerConfig::default(),
        );

        let outcome = ranker.rank("justice", documents()).await;

        assert!(!outcome.reranked);
        assert_eq!(outcome.documents.len(), 3);
    }

    #[tokio::test]
    async fn test_truncates_to_top_k() {
        let config = RankerConfig::default().with_top_k(2);
        let ranker = Ranker::new(Arc::new(model()), config);

        let outcome = ranker.rank("justice", documents()).await;

        assert_eq!(outcome.documents.len(), 2);
        assert_eq!(outcome.after_dedup, 3);
    }

    #[tokio::test]
    async fn test_fusion_is_deterministic() {
        let ranker = Ranker::new(Arc::new(model()), RankerConfig::default());

        let first = ranker.rank("justice", documents()).await;
        let second = ranker.rank("justice", documents()).await;

        assert_eq!(first.documents, second.documents);
    }
}
