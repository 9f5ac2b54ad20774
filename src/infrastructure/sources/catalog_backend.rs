//! Client for the catalog search service fronting the library scrapers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::domain::retrieval::{MaterialType, YearRange};
use crate::domain::source::CatalogQuery;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Collection searched by a catalog request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogCollection {
    Holdings,
    Electronic,
}

impl CatalogCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Holdings => "holdings",
            Self::Electronic => "electronic",
        }
    }
}

/// One search sent to the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogBackendRequest {
    pub collection: CatalogCollection,
    pub query: CatalogQuery,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<CatalogQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material_types: Vec<MaterialType>,
    #[serde(default)]
    pub academic_journals_only: bool,
    #[serde(default)]
    pub foreign_language: bool,
    pub limit: usize,
}

/// A catalog record in the service's result order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    /// Holdings description
    #[serde(default)]
    pub description: Option<String>,
    /// Electronic resource abstract
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub material_type: Option<String>,
    #[serde(default)]
    pub journal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogSearchResponse {
    #[serde(default)]
    records: Vec<CatalogRecord>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

/// Catalog search service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Search one collection; records come back in native relevance order
    async fn search(&self, request: &CatalogBackendRequest)
        -> Result<Vec<CatalogRecord>, DomainError>;

    /// Check that the collection can be searched
    async fn health_check(&self, collection: CatalogCollection) -> Result<bool, DomainError>;
}

/// Catalog service reached over HTTP
#[derive(Debug)]
pub struct HttpCatalogBackend<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> HttpCatalogBackend<C> {
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, collection: CatalogCollection) -> String {
        format!("{}/search/{}", self.base_url, collection.as_str())
    }

    fn health_url(&self, collection: CatalogCollection) -> String {
        format!("{}/health/{}", self.base_url, collection.as_str())
    }
}

#[async_trait]
impl<C: HttpClientTrait> CatalogBackend for HttpCatalogBackend<C> {
    async fn search(
        &self,
        request: &CatalogBackendRequest,
    ) -> Result<Vec<CatalogRecord>, DomainError> {
        let body = serde_json::to_value(request).map_err(|e| {
            DomainError::internal(format!("Failed to encode catalog request: {}", e))
        })?;

        let response = self
            .client
            .post_json(&self.search_url(request.collection), vec![], &body)
            .await
            .map_err(|e| DomainError::source(request.collection.as_str(), e.to_string()))?;

        let parsed: CatalogSearchResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::source(
                request.collection.as_str(),
                format!("Failed to parse catalog response: {}", e),
            )
        })?;

        Ok(parsed.records)
    }

    async fn health_check(&self, collection: CatalogCollection) -> Result<bool, DomainError> {
        let response = self
            .client
            .get_json(&self.health_url(collection), vec![])
            .await?;

        let health: HealthResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::source(collection.as_str(), format!("Invalid health response: {}", e))
        })?;

        Ok(health.status.eq_ignore_ascii_case("ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::SearchField;
    use crate::infrastructure::http_client::HttpClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> CatalogBackendRequest {
        CatalogBackendRequest {
            collection: CatalogCollection::Holdings,
            query: CatalogQuery::new("정의론", SearchField::Title),
            exclusions: vec![],
            year_range: Some(YearRange::new(1990, 2020)),
            material_types: vec![MaterialType::Book],
            academic_journals_only: false,
            foreign_language: false,
            limit: 10,
        }
    }

    #[tokio::test]
    async fn test_search_posts_request_and_parses_records() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search/holdings"))
            .and(body_partial_json(json!({
                "collection": "holdings",
                "query": {"query": "정의론", "field": "title"},
                "limit": 10
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "records": [
                    {"id": "h-1", "title": "정의론", "author": "존 롤스", "publication_year": 2003},
                    {"id": "h-2", "title": "정의란 무엇인가"}
                ]
            })))
            .mount(&server)
            .await;

        let backend = HttpCatalogBackend::new(HttpClient::new(), server.uri());
        let records = backend.search(&request()).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author.as_deref(), Some("존 롤스"));
        assert_eq!(records[0].publication_year, Some(2003));
        assert!(records[1].author.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_is_source_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search/holdings"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let backend = HttpCatalogBackend::new(HttpClient::new(), format!("{}/", server.uri()));
        let result = backend.search(&request()).await;

        assert!(matches!(result, Err(DomainError::Source { .. })));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health/electronic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let backend = HttpCatalogBackend::new(HttpClient::new(), server.uri());

        assert!(backend
            .health_check(CatalogCollection::Electronic)
            .await
            .unwrap());
    }
}
