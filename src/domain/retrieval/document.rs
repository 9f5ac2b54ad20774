//! Source-agnostic retrieval hits

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::request::RetrievalRoute;

/// A retrieval hit from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier within the source, if the source has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Free-text content used for dedup, reranking and judgment
    pub content: String,
    /// Open attributes (title, author, publication_year, isbn, url, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Score in the source's native scale; not comparable across sources
    pub score: f32,
    /// Originating source, set by the retriever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<RetrievalRoute>,
    /// 1-based position in the source's own result list, set by the retriever
    #[serde(default)]
    pub source_rank: usize,
}

impl Document {
    /// Create a new document
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            id: None,
            content: content.into(),
            metadata: HashMap::new(),
            score,
            source: None,
            source_rank: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Tag with provenance
    pub fn with_provenance(mut self, source: RetrievalRoute, source_rank: usize) -> Self {
        self.source = Some(source);
        self.source_rank = source_rank;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }

    pub fn publication_year(&self) -> Option<i64> {
        self.metadata.get("publication_year").and_then(|v| v.as_i64())
    }
}

/// A document placed in the fused ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    pub id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    /// Pairwise relevance to the user query
    pub rerank_score: f32,
    /// Output of the configured fusion strategy; the sort key
    pub fused_score: f32,
    /// The source's native score
    pub original_score: f32,
    pub source: Option<RetrievalRoute>,
    pub source_rank: usize,
    /// 1-based final rank
    pub rank: usize,
}

impl RankedDocument {
    /// Wrap a document before fusion; `fused_score` and `rank` are set by the ranker
    pub fn from_document(document: Document, rerank_score: f32) -> Self {
        Self {
            id: document.id,
            content: document.content,
            metadata: document.metadata,
            rerank_score,
            fused_score: 0.0,
            original_score: document.score,
            source: document.source,
            source_rank: document.source_rank,
            rank: 0,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("Rust in Action", 0.5)
            .with_id("b-1")
            .with_metadata("title", json!("Rust in Action"))
            .with_metadata("publication_year", json!(2021))
            .with_provenance(RetrievalRoute::LibraryHoldings, 1);

        assert_eq!(doc.id.as_deref(), Some("b-1"));
        assert_eq!(doc.title(), Some("Rust in Action"));
        assert_eq!(doc.publication_year(), Some(2021));
        assert_eq!(doc.source, Some(RetrievalRoute::LibraryHoldings));
        assert_eq!(doc.source_rank, 1);
    }

    #[test]
    fn test_ranked_from_document_keeps_native_score() {
        let doc = Document::new("content", 0.25).with_provenance(RetrievalRoute::VectorIndex, 3);
        let ranked = RankedDocument::from_document(doc, 0.9);

        assert_eq!(ranked.original_score, 0.25);
        assert_eq!(ranked.rerank_score, 0.9);
        assert_eq!(ranked.source_rank, 3);
        assert_eq!(ranked.rank, 0);
    }
}
