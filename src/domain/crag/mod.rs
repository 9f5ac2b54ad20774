//! CRAG (Corrective RAG) domain
//!
//! This module provides domain types and traits for judging ranked documents
//! against the user's question, filtering them by quality and deciding whether
//! external web search is needed.

mod config;
mod judge;
mod judgment;
mod quality;

pub use config::{CragConfig, RelevanceLabel};
pub use judge::RelevanceJudge;
pub use judgment::{JudgmentOutcome, JudgmentSummary, RelevanceJudgment};
pub use quality::{filter_by_quality, needs_web_search, passes_quality, CragFilter};

#[cfg(test)]
pub use judge::mock::MockRelevanceJudge;
