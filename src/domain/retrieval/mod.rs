//! Retrieval data model
//!
//! Requests coming from the query planner, the documents flowing between
//! pipeline stages and the result envelope handed downstream.

mod document;
mod request;
mod result;
mod validation;

pub use document::{Document, RankedDocument};
pub use request::{
    MaterialType, QueryClause, QueryOperator, RetrievalRoute, SearchField, SearchFilters,
    SearchQueries, SearchRequest, YearRange,
};
pub use result::{RetrievalMetadata, RetrievalResult, SourceFailure};
pub use validation::{
    validate_search_request, RequestValidationError, MAX_TOP_K, MAX_YEAR, MIN_YEAR,
};
