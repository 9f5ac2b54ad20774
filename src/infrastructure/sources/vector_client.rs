//! Client for the embedding index service over book metadata

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// A nearest-neighbour hit joined with its book metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    /// Book identifier (ISBN)
    pub id: String,
    /// Distance to the query embedding; smaller is closer
    pub distance: f32,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    /// 0 when the year is unknown
    #[serde(default)]
    pub publication_year: i32,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub table_of_contents: String,
    #[serde(default)]
    pub subjects: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VectorSearchResponse {
    #[serde(default)]
    hits: Vec<VectorHit>,
}

#[derive(Debug, Deserialize)]
struct VectorStatsResponse {
    vector_count: u64,
}

/// Embedding index service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VectorIndexClient: Send + Sync {
    /// Nearest neighbours of `query`, closest first
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VectorHit>, DomainError>;

    /// Number of vectors in the loaded index
    async fn vector_count(&self) -> Result<u64, DomainError>;
}

/// Embedding index reached over HTTP
#[derive(Debug)]
pub struct HttpVectorIndexClient<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> HttpVectorIndexClient<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndexClient for HttpVectorIndexClient<C> {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<VectorHit>, DomainError> {
        let body = serde_json::json!({ "query": query, "k": limit });

        let response = self
            .client
            .post_json(&format!("{}/search", self.base_url), vec![], &body)
            .await
            .map_err(|e| DomainError::source("vector_index", e.to_string()))?;

        let parsed: VectorSearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::source("vector_index", format!("Failed to parse search response: {}", e))
        })?;

        Ok(parsed.hits)
    }

    async fn vector_count(&self) -> Result<u64, DomainError> {
        let response = self
            .client
            .get_json(&format!("{}/stats", self.base_url), vec![])
            .await?;

        let stats: VectorStatsResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::source("vector_index", format!("Invalid stats response: {}", e))
        })?;

        Ok(stats.vector_count)
    }
}
