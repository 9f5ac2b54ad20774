//! Vector index adapter over the embedded book metadata

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use super::vector_client::{VectorHit, VectorIndexClient};
use crate::domain::retrieval::{Document, RetrievalRoute, SearchRequest, YearRange};
use crate::domain::source::{ExecutionLane, SourceAdapter, SourceParams, VectorSearchParams};
use crate::domain::DomainError;

/// Nearest neighbours requested per result kept, so the year filter has room to work
const OVERFETCH_FACTOR: usize = 2;

/// Similarity search over the local embedding index
pub struct VectorIndexAdapter {
    client: Arc<dyn VectorIndexClient>,
}

impl std::fmt::Debug for VectorIndexAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndexAdapter").finish_non_exhaustive()
    }
}

/// Convert a distance to a similarity score in (0, 1]
pub fn distance_score(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}

impl VectorIndexAdapter {
    pub fn new(client: Arc<dyn VectorIndexClient>) -> Self {
        Self { client }
    }

    /// Unknown years (0) always pass
    fn within_years(hit: &VectorHit, year_range: Option<&YearRange>) -> bool {
        match year_range {
            Some(range) if hit.publication_year != 0 => range.contains(hit.publication_year),
            _ => true,
        }
    }

    fn to_document(hit: VectorHit) -> Document {
        let score = distance_score(hit.distance);
        let content = [
            hit.title.as_str(),
            hit.intro.as_str(),
            hit.table_of_contents.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

        let mut document = Document::new(content, score)
            .with_id(hit.id.clone())
            .with_metadata("title", json!(hit.title))
            .with_metadata("isbn", json!(hit.id))
            .with_metadata("distance", json!(hit.distance));

        if hit.publication_year != 0 {
            document = document.with_metadata("publication_year", json!(hit.publication_year));
        }
        if let Some(author) = hit.author {
            document = document.with_metadata("author", json!(author));
        }
        if let Some(subjects) = hit.subjects {
            document = document.with_metadata("subjects", json!(subjects));
        }
        if let Some(url) = hit.url {
            document = document.with_metadata("url", json!(url));
        }

        document
    }
}

#[async_trait]
impl SourceAdapter for VectorIndexAdapter {
    fn route(&self) -> RetrievalRoute {
        RetrievalRoute::VectorIndex
    }

    fn execution_lane(&self) -> ExecutionLane {
        ExecutionLane::Isolated
    }

    fn translate(&self, request: &SearchRequest) -> Result<SourceParams, DomainError> {
        let clauses = request.clauses()?;
        Ok(SourceParams::Vector(VectorSearchParams::from_clauses(
            &clauses,
            &request.filters,
        )))
    }

    async fn search(
        &self,
        params: SourceParams,
        top_k: usize,
    ) -> Result<Vec<Document>, DomainError> {
        let SourceParams::Vector(params) = params else {
            return Err(DomainError::source(
                self.source_name(),
                format!("Unsupported parameters: {}", params.kind()),
            ));
        };

        let limit = top_k.saturating_mul(OVERFETCH_FACTOR);
        let mut slots: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<VectorHit> = Vec::new();
        let mut last_error = None;
        let mut succeeded = 0;

        // One query at a time; the index client is not shared across tasks
        for query in &params.queries {
            let hits = match self.client.search(query, limit).await {
                Ok(hits) => {
                    succeeded += 1;
                    hits
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Vector index query failed");
                    last_error = Some(e);
                    continue;
                }
            };

            for hit in hits {
                match slots.get(&hit.id) {
                    Some(&slot) => {
                        if hit.distance < merged[slot].distance {
                            merged[slot] = hit;
                        }
                    }
                    None => {
                        slots.insert(hit.id.clone(), merged.len());
                        merged.push(hit);
                    }
                }
            }
        }

        if succeeded == 0 {
            if let Some(error) = last_error {
                return Err(error);
            }
        }

        let fetched = merged.len();
        merged.retain(|hit| Self::within_years(hit, params.year_range.as_ref()));
        merged.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        merged.truncate(top_k);

        debug!(
            fetched = fetched,
            kept = merged.len(),
            "Vector index search complete"
        );

        Ok(merged.into_iter().map(Self::to_document).collect())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        Ok(self.client.vector_count().await? > 0)
    }
}
