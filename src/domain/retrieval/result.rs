//! Pipeline result envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::RankedDocument;
use super::request::RetrievalRoute;
use crate::domain::crag::{JudgmentSummary, RelevanceJudgment};
use crate::domain::ranking::FusionMethod;

/// A source that contributed nothing because it failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: RetrievalRoute,
    pub reason: String,
}

impl SourceFailure {
    pub fn new(source: RetrievalRoute, reason: impl Into<String>) -> Self {
        Self {
            source,
            reason: reason.into(),
        }
    }
}

/// Timing and per-stage counts of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMetadata {
    pub request_id: String,
    pub completed_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub total_retrieved: usize,
    pub after_dedup: usize,
    pub after_rerank: usize,
    pub after_crag: usize,
    /// Distinct sources among the surviving documents, sorted
    pub sources_used: Vec<RetrievalRoute>,
    pub sources_attempted: Vec<RetrievalRoute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_sources: Vec<SourceFailure>,
    pub judgment_summary: JudgmentSummary,
    pub fusion_method: FusionMethod,
    /// Every attempted source failed
    pub all_sources_failed: bool,
    /// Nothing was retrieved at all
    pub insufficient_data: bool,
}

/// Final envelope handed to the answer generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Filtered documents in rank order; ranks may have gaps
    pub documents: Vec<RankedDocument>,
    /// Every judgment, including those of dropped documents
    pub judgments: Vec<RelevanceJudgment>,
    pub metadata: RetrievalMetadata,
    /// Internal sources were insufficient; escalate to web search
    pub needs_web_search: bool,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
