//! Library holdings catalog adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::catalog::search_branches;
use super::catalog_backend::{CatalogBackend, CatalogCollection, CatalogRecord};
use crate::domain::retrieval::{Document, RetrievalRoute, SearchField, SearchRequest};
use crate::domain::source::{CatalogSearchParams, SourceAdapter, SourceParams};
use crate::domain::DomainError;

/// Searches books, theses and printed serials held by the library
pub struct LibraryHoldingsAdapter {
    backend: Arc<dyn CatalogBackend>,
}

impl std::fmt::Debug for LibraryHoldingsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryHoldingsAdapter").finish_non_exhaustive()
    }
}

impl LibraryHoldingsAdapter {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    /// Holdings search has no keyword or abstract selector
    fn native_field(field: SearchField) -> SearchField {
        match field {
            SearchField::Keyword | SearchField::Abstract => SearchField::Total,
            other => other,
        }
    }

    fn to_document(record: CatalogRecord, score: f32) -> Document {
        let content = [
            Some(record.title.as_str()),
            record.author.as_deref(),
            record.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let mut document = Document::new(content, score)
            .with_id(record.id)
            .with_metadata("title", json!(record.title));

        let optional = [
            ("author", record.author.map(|v| json!(v))),
            ("publisher", record.publisher.map(|v| json!(v))),
            ("publication_year", record.publication_year.map(|v| json!(v))),
            ("isbn", record.isbn.map(|v| json!(v))),
            ("url", record.url.map(|v| json!(v))),
            ("material_type", record.material_type.map(|v| json!(v))),
            ("description", record.description.map(|v| json!(v))),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                document = document.with_metadata(key, value);
            }
        }

        document
    }
}

#[async_trait]
impl SourceAdapter for LibraryHoldingsAdapter {
    fn route(&self) -> RetrievalRoute {
        RetrievalRoute::LibraryHoldings
    }

    fn translate(&self, request: &SearchRequest) -> Result<SourceParams, DomainError> {
        let clauses = request.clauses()?;
        let mut params = CatalogSearchParams::from_clauses(&clauses, &request.filters);

        for query in params.branches.iter_mut().chain(params.exclusions.iter_mut()) {
            query.field = Self::native_field(query.field);
        }
        params.academic_journals_only = false;
        params.foreign_language = false;

        Ok(SourceParams::Catalog(params))
    }

    async fn search(
        &self,
        params: SourceParams,
        top_k: usize,
    ) -> Result<Vec<Document>, DomainError> {
        let SourceParams::Catalog(params) = params else {
            return Err(DomainError::source(
                self.source_name(),
                format!("Unsupported parameters: {}", params.kind()),
            ));
        };

        let hits = search_branches(
            self.backend.as_ref(),
            CatalogCollection::Holdings,
            &params,
            top_k,
        )
        .await?;

        Ok(hits
            .into_iter()
            .map(|(record, score)| Self::to_document(record, score))
            .collect())
    }

    async fn health_check(&self) -> Result<bool, DomainError> {
        self.backend.health_check(CatalogCollection::Holdings).await
    }
}
