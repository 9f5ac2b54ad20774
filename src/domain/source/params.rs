//! Source-specific search parameters derived from a request

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::retrieval::{
    MaterialType, QueryClause, QueryOperator, SearchField, SearchFilters, YearRange,
};

/// One query sent to a catalog backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub query: String,
    pub field: SearchField,
}

impl CatalogQuery {
    pub fn new(query: impl Into<String>, field: SearchField) -> Self {
        Self {
            query: query.into(),
            field,
        }
    }
}

/// Parameters for the holdings and electronic-resource catalogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSearchParams {
    /// One backend search per branch; the first branch carries AND-combined clauses
    pub branches: Vec<CatalogQuery>,
    /// Clauses combined with NOT, excluded natively by the backend
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<CatalogQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material_types: Vec<MaterialType>,
    #[serde(default)]
    pub academic_journals_only: bool,
    #[serde(default)]
    pub foreign_language: bool,
}

impl CatalogSearchParams {
    /// Split clauses into OR branches and NOT exclusions
    pub fn from_clauses(clauses: &[QueryClause], filters: &SearchFilters) -> Self {
        let mut branches: Vec<CatalogQuery> = Vec::new();
        let mut exclusions = Vec::new();

        for clause in clauses {
            match clause.operator {
                None => branches.push(CatalogQuery::new(clause.query.trim(), clause.search_field)),
                Some(QueryOperator::And) => {
                    if let Some(primary) = branches.first_mut() {
                        primary.query = format!("{} {}", primary.query, clause.query.trim());
                    }
                }
                Some(QueryOperator::Or) => {
                    branches.push(CatalogQuery::new(clause.query.trim(), clause.search_field))
                }
                Some(QueryOperator::Not) => {
                    exclusions.push(CatalogQuery::new(clause.query.trim(), clause.search_field))
                }
            }
        }

        Self {
            branches,
            exclusions,
            year_range: filters.year_range,
            material_types: filters.material_types.clone(),
            academic_journals_only: filters.academic_journals_only.unwrap_or(false),
            foreign_language: filters.foreign_language.unwrap_or(false),
        }
    }
}

/// Parameters for the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorSearchParams {
    /// One similarity query per OR branch
    pub queries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<YearRange>,
}

impl VectorSearchParams {
    /// Build query texts; NOT clauses cannot be expressed as similarity and are dropped
    pub fn from_clauses(clauses: &[QueryClause], filters: &SearchFilters) -> Self {
        let mut queries: Vec<String> = Vec::new();

        for clause in clauses {
            match clause.operator {
                None | Some(QueryOperator::Or) => queries.push(clause.query.trim().to_string()),
                Some(QueryOperator::And) => {
                    if let Some(primary) = queries.first_mut() {
                        primary.push(' ');
                        primary.push_str(clause.query.trim());
                    }
                }
                Some(QueryOperator::Not) => {
                    debug!(
                        excluded = %clause.query,
                        "Vector index cannot express exclusion, ignoring NOT clause"
                    );
                }
            }
        }

        Self {
            queries,
            year_range: filters.year_range,
        }
    }
}

/// Parameters produced by an adapter's translate step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceParams {
    Catalog(CatalogSearchParams),
    Vector(VectorSearchParams),
}

impl SourceParams {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Catalog(_) => "catalog",
            Self::Vector(_) => "vector",
        }
    }
}
