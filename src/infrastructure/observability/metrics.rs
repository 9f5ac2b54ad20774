//! Retrieval pipeline metrics

use std::time::Duration;

use metrics::{counter, histogram};

use crate::domain::crag::RelevanceLabel;
use crate::domain::retrieval::RetrievalRoute;

/// Outcome of one source search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Success,
    Error,
    Timeout,
    Unregistered,
}

impl SourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Timeout => "timeout",
            Self::Unregistered => "unregistered",
        }
    }
}

/// Whether a judgment came from the model or from the fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgmentStatus {
    Judged,
    Fallback,
}

impl JudgmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Judged => "judged",
            Self::Fallback => "fallback",
        }
    }
}

/// Record one completed pipeline run
pub fn record_pipeline_run(elapsed: Duration, needs_web_search: bool) {
    let labels = [("needs_web_search", needs_web_search.to_string())];

    counter!("retrieval_pipeline_runs_total", &labels).increment(1);
    histogram!("retrieval_pipeline_duration_seconds").record(elapsed.as_secs_f64());
}

/// Record one source search and the documents it contributed
pub fn record_source_search(source: RetrievalRoute, status: SourceStatus, documents: usize) {
    let labels = [
        ("source", source.as_str().to_string()),
        ("status", status.as_str().to_string()),
    ];

    counter!("retrieval_source_searches_total", &labels).increment(1);

    if documents > 0 {
        counter!("retrieval_source_documents_total", "source" => source.as_str())
            .increment(documents as u64);
    }
}

/// Record one relevance judgment
pub fn record_judgment(label: RelevanceLabel, status: JudgmentStatus) {
    let labels = [
        ("label", label.as_str().to_string()),
        ("status", status.as_str().to_string()),
    ];

    counter!("retrieval_judgments_total", &labels).increment(1);
}
