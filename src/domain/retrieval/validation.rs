//! Search request validation

use std::collections::HashSet;
use std::fmt;

use super::request::{RetrievalRoute, SearchRequest};

/// Maximum per-source result cap
pub const MAX_TOP_K: u32 = 100;

/// Accepted publication year bounds
pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 2100;

/// Reasons a search request is rejected before retrieval
#[derive(Debug, Clone, PartialEq)]
pub enum RequestValidationError {
    /// No routes were requested
    EmptyRoutes,
    /// A route appears more than once
    DuplicateRoute { route: RetrievalRoute },
    /// The original user question is blank
    EmptyUserQuery,
    /// A clause is present but its query text is blank
    EmptyClause { position: usize },
    /// A later clause is present while an earlier one is missing
    MissingClause { position: usize },
    /// A clause is present without its search field
    MissingSearchField { position: usize },
    /// A clause after the first is present without its combining operator
    MissingOperator { position: usize },
    /// An operator is set for a clause that is absent
    DanglingOperator { position: usize },
    /// top_k out of range
    InvalidTopK { value: u32, min: u32, max: u32 },
    /// Year range bound out of range
    InvalidYear { value: i32 },
    /// Year range with from > to
    InvertedYearRange { from: i32, to: i32 },
}

impl fmt::Display for RequestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoutes => write!(f, "At least one retrieval route is required"),
            Self::DuplicateRoute { route } => write!(f, "Route '{}' is listed more than once", route),
            Self::EmptyUserQuery => write!(f, "User query cannot be empty"),
            Self::EmptyClause { position } => {
                write!(f, "Query clause {} cannot be empty", position)
            }
            Self::MissingClause { position } => {
                write!(
                    f,
                    "Query clause {} is missing while a later clause is present",
                    position
                )
            }
            Self::MissingSearchField { position } => {
                write!(f, "Query clause {} has no search field", position)
            }
            Self::MissingOperator { position } => {
                write!(f, "Query clause {} has no combining operator", position)
            }
            Self::DanglingOperator { position } => {
                write!(
                    f,
                    "Combining operator given for absent query clause {}",
                    position
                )
            }
            Self::InvalidTopK { value, min, max } => {
                write!(f, "Invalid top_k {}: must be between {} and {}", value, min, max)
            }
            Self::InvalidYear { value } => {
                write!(
                    f,
                    "Invalid year {}: must be between {} and {}",
                    value, MIN_YEAR, MAX_YEAR
                )
            }
            Self::InvertedYearRange { from, to } => {
                write!(f, "Invalid year range: {} is after {}", from, to)
            }
        }
    }
}

impl std::error::Error for RequestValidationError {}

/// Validate a search request
pub fn validate_search_request(request: &SearchRequest) -> Result<(), RequestValidationError> {
    if request.routes.is_empty() {
        return Err(RequestValidationError::EmptyRoutes);
    }

    let mut seen = HashSet::new();
    for route in &request.routes {
        if !seen.insert(*route) {
            return Err(RequestValidationError::DuplicateRoute { route: *route });
        }
    }

    if request.user_query.trim().is_empty() {
        return Err(RequestValidationError::EmptyUserQuery);
    }

    request.queries.to_clauses()?;

    if request.top_k == 0 || request.top_k > MAX_TOP_K {
        return Err(RequestValidationError::InvalidTopK {
            value: request.top_k,
            min: 1,
            max: MAX_TOP_K,
        });
    }

    if let Some(range) = request.filters.year_range {
        for year in [range.from_year, range.to_year].into_iter().flatten() {
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(RequestValidationError::InvalidYear { value: year });
            }
        }

        if let (Some(from), Some(to)) = (range.from_year, range.to_year) {
            if from > to {
                return Err(RequestValidationError::InvertedYearRange { from, to });
            }
        }
    }

    Ok(())
}
