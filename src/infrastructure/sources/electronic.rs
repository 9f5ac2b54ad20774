//! Electronic resources catalog adapter

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::catalog::search_branches;
use super::catalog_backend::{CatalogBackend, CatalogCollection, CatalogRecord};
use crate::domain::retrieval::{Document, RetrievalRoute, SearchField, SearchRequest};
use crate::domain::source::{CatalogSearchParams, SourceAdapter, SourceParams};
use crate::domain::DomainError;

/// Searches licensed articles and e-journals
pub struct ElectronicResourcesAdapter {
    backend: Arc<dyn CatalogBackend>,
}

impl std::fmt::Debug for ElectronicResourcesAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElectronicResourcesAdapter").finish_non_exhaustive()
    }
}

impl ElectronicResourcesAdapter {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self { backend }
    }

    fn native_field(field: SearchField) -> SearchField {
        match field {
            SearchField::Subject => SearchField::Total,
            other => other,
        }
    }

    fn to_document(record: CatalogRecord, score: f32) -> Document {
        let content = [
            Some(record.title.as_str()),
            record.author.as_deref(),
            record.abstract_text.as_deref(),
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
            ("author", record.author),
            ("publisher", record.publisher),
            ("journal", record.journal),
            ("doi", record.doi),
            ("url", record.url),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                document = document.with_metadata(key, json!(value));
            }
        }
        if let Some(year) = record.publication_year {
            document = document.with_metadata("publication_year", json!(year));
        }

        document
    }
}

#[async_trait]
impl SourceAdapter for ElectronicResourcesAdapter {
    fn route(&self) -> RetrievalRoute {
        RetrievalRoute::ElectronicResources
    }

    fn translate(&self, request: &SearchRequest) -> Result<SourceParams, DomainError> {
        let clauses = request.clauses()?;
        let mut params = CatalogSearchParams::from_clauses(&clauses, &request.filters);

        for query in params.branches.iter_mut().chain(params.exclusions.iter_mut()) {
            query.field = Self::native_field(query.field);
        }
        params.material_types.clear();

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
            CatalogCollection::Electronic,
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
        self.backend.health_check(CatalogCollection::Electronic).await
    }
}
