//! Domain layer - Core pipeline types and capability traits

pub mod crag;
pub mod error;
pub mod llm;
pub mod ranking;
pub mod retrieval;
pub mod source;

pub use crag::{
    filter_by_quality, needs_web_search, CragConfig, CragFilter, JudgmentOutcome,
    JudgmentSummary, RelevanceJudge, RelevanceJudgment, RelevanceLabel,
};
pub use error::DomainError;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, LlmResponseFormat,
    Message, MessageRole, Usage,
};
pub use ranking::{FusionMethod, RankerConfig, RelevanceModel};
pub use retrieval::{
    Document, QueryClause, QueryOperator, RankedDocument, RequestValidationError,
    RetrievalMetadata, RetrievalResult, RetrievalRoute, SearchField, SearchFilters,
    SearchQueries, SearchRequest, SourceFailure,
};
pub use source::{
    CatalogQuery, CatalogSearchParams, ExecutionLane, SourceAdapter, SourceParams,
    VectorSearchParams,
};
