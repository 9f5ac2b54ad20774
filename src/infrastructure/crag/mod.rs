//! CRAG (Corrective RAG) infrastructure
//!
//! Relevance judge implementations used by the refiner.

mod cached_judge;
mod llm_judge;

pub use cached_judge::CachedRelevanceJudge;
pub use llm_judge::{parse_judgment, truncate_graphemes, LlmRelevanceJudge};
