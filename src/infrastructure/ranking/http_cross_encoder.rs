//! Cross-encoder reranker served over HTTP
//!
//! Speaks the `/rerank` contract shared by text-embeddings-inference and
//! similar servers: `{model, query, texts}` in, `[{index, score}]` out.
//! Single-model servers ignore `model`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ranking::RelevanceModel;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

#[derive(Debug, Deserialize)]
struct RerankHit {
    index: usize,
    score: f32,
}

/// Reranker calling a remote cross-encoder
#[derive(Debug)]
pub struct HttpCrossEncoder<C: HttpClientTrait> {
    client: C,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> HttpCrossEncoder<C> {
    pub fn new(client: C, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn rerank_url(&self) -> String {
        format!("{}/rerank", self.base_url)
    }
}

#[async_trait]
impl<C: HttpClientTrait> RelevanceModel for HttpCrossEncoder<C> {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({
            "model": self.model,
            "query": query,
            "texts": texts,
        });

        let response = self
            .client
            .post_json(&self.rerank_url(), vec![("Content-Type", "application/json")], &body)
            .await?;

        let hits: Vec<RerankHit> = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("cross_encoder", format!("Failed to parse rerank response: {}", e))
        })?;

        // The server returns hits sorted by score; put them back in input order
        let mut scores: Vec<Option<f32>> = vec![None; texts.len()];
        for hit in hits {
            let slot = scores.get_mut(hit.index).ok_or_else(|| {
                DomainError::provider(
                    "cross_encoder",
                    format!("Rerank index {} out of range for {} texts", hit.index, texts.len()),
                )
            })?;
            *slot = Some(hit.score);
        }

        scores
            .into_iter()
            .enumerate()
            .map(|(index, score)| {
                score.ok_or_else(|| {
                    DomainError::provider(
                        "cross_encoder",
                        format!("Rerank response is missing index {}", index),
                    )
                })
            })
            .collect()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
