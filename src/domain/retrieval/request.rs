//! Search request types consumed from the query-planning collaborator

use serde::{Deserialize, Serialize};

use super::validation::{validate_search_request, RequestValidationError};

/// Identifier of one configured data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalRoute {
    /// Library holdings catalog (books, theses, printed serials)
    LibraryHoldings,
    /// Licensed electronic resources (articles, e-journals)
    ElectronicResources,
    /// Local embedding index over book metadata
    VectorIndex,
}

impl RetrievalRoute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LibraryHoldings => "library_holdings",
            Self::ElectronicResources => "electronic_resources",
            Self::VectorIndex => "vector_index",
        }
    }

    pub fn all() -> [RetrievalRoute; 3] {
        [
            Self::LibraryHoldings,
            Self::ElectronicResources,
            Self::VectorIndex,
        ]
    }
}

impl std::fmt::Display for RetrievalRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Operator combining a clause with the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperator {
    #[serde(alias = "AND")]
    And,
    #[serde(alias = "OR")]
    Or,
    #[serde(alias = "NOT")]
    Not,
}

/// Field a clause is matched against; each source maps it to its native selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    #[serde(alias = "TOTAL")]
    Total,
    #[serde(alias = "TITLE")]
    Title,
    #[serde(alias = "AUTHOR")]
    Author,
    #[serde(alias = "PUBLISHER")]
    Publisher,
    #[serde(alias = "SUBJECT")]
    Subject,
    #[serde(alias = "KEYWORD")]
    Keyword,
    #[serde(alias = "ABSTRACT")]
    Abstract,
    #[serde(alias = "ISBN")]
    Isbn,
}

/// One ordered query clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    pub query: String,
    pub search_field: SearchField,
    /// Operator relative to the previous clause; `None` only for the first clause
    pub operator: Option<QueryOperator>,
}

impl QueryClause {
    /// Create the leading clause
    pub fn first(query: impl Into<String>, search_field: SearchField) -> Self {
        Self {
            query: query.into(),
            search_field,
            operator: None,
        }
    }

    /// Create a clause combined with the previous one
    pub fn combined(
        operator: QueryOperator,
        query: impl Into<String>,
        search_field: SearchField,
    ) -> Self {
        Self {
            query: query.into(),
            search_field,
            operator: Some(operator),
        }
    }
}

/// Flat wire form of up to three clauses, as produced by the query planner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQueries {
    pub query_1: String,
    #[serde(default)]
    pub search_field_1: SearchField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_field_2: Option<SearchField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_1: Option<QueryOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_field_3: Option<SearchField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_2: Option<QueryOperator>,
}

impl SearchQueries {
    /// Create queries with a single clause searched across all fields
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_1: query.into(),
            ..Default::default()
        }
    }

    /// Set the field of the first clause
    pub fn with_field(mut self, field: SearchField) -> Self {
        self.search_field_1 = field;
        self
    }

    /// Add the second clause
    pub fn with_second(
        mut self,
        operator: QueryOperator,
        query: impl Into<String>,
        field: SearchField,
    ) -> Self {
        self.query_2 = Some(query.into());
        self.search_field_2 = Some(field);
        self.operator_1 = Some(operator);
        self
    }

    /// Add the third clause
    pub fn with_third(
        mut self,
        operator: QueryOperator,
        query: impl Into<String>,
        field: SearchField,
    ) -> Self {
        self.query_3 = Some(query.into());
        self.search_field_3 = Some(field);
        self.operator_2 = Some(operator);
        self
    }

    /// Convert to ordered clauses, rejecting gaps and dangling operators
    pub fn to_clauses(&self) -> Result<Vec<QueryClause>, RequestValidationError> {
        if self.query_1.trim().is_empty() {
            return Err(RequestValidationError::EmptyClause { position: 1 });
        }

        let mut clauses = vec![QueryClause::first(&self.query_1, self.search_field_1)];

        let second = Self::optional_clause(
            2,
            self.query_2.as_deref(),
            self.search_field_2,
            self.operator_1,
        )?;
        let third = Self::optional_clause(
            3,
            self.query_3.as_deref(),
            self.search_field_3,
            self.operator_2,
        )?;

        match (second, third) {
            (Some(second), Some(third)) => {
                clauses.push(second);
                clauses.push(third);
            }
            (Some(second), None) => clauses.push(second),
            (None, Some(_)) => return Err(RequestValidationError::MissingClause { position: 2 }),
            (None, None) => {}
        }

        Ok(clauses)
    }

    fn optional_clause(
        position: usize,
        query: Option<&str>,
        field: Option<SearchField>,
        operator: Option<QueryOperator>,
    ) -> Result<Option<QueryClause>, RequestValidationError> {
        let Some(query) = query else {
            if operator.is_some() {
                return Err(RequestValidationError::DanglingOperator { position });
            }
            return Ok(None);
        };

        if query.trim().is_empty() {
            return Err(RequestValidationError::EmptyClause { position });
        }

        let field = field.ok_or(RequestValidationError::MissingSearchField { position })?;
        let operator = operator.ok_or(RequestValidationError::MissingOperator { position })?;

        Ok(Some(QueryClause::combined(operator, query, field)))
    }
}

/// Publication year range, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_year: Option<i32>,
}

impl YearRange {
    pub fn new(from_year: i32, to_year: i32) -> Self {
        Self {
            from_year: Some(from_year),
            to_year: Some(to_year),
        }
    }

    /// Whether a year falls inside the range; open ends accept anything
    pub fn contains(&self, year: i32) -> bool {
        self.from_year.is_none_or(|from| year >= from) && self.to_year.is_none_or(|to| year <= to)
    }
}

/// Material type filter for the holdings catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    #[serde(alias = "TOTAL")]
    Total,
    #[serde(alias = "BOOK")]
    Book,
    #[serde(alias = "THESIS")]
    Thesis,
    #[serde(alias = "JOURNAL")]
    Journal,
    #[serde(alias = "MULTIMEDIA")]
    Multimedia,
}

/// Optional filters; each source applies the subset it understands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_range: Option<YearRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub material_types: Vec<MaterialType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_journals_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_language: Option<bool>,
}

impl SearchFilters {
    pub fn with_year_range(mut self, from_year: i32, to_year: i32) -> Self {
        self.year_range = Some(YearRange::new(from_year, to_year));
        self
    }

    pub fn with_material_types(mut self, types: Vec<MaterialType>) -> Self {
        self.material_types = types;
        self
    }

    pub fn with_academic_journals_only(mut self, only: bool) -> Self {
        self.academic_journals_only = Some(only);
        self
    }
}

fn default_top_k() -> u32 {
    10
}

/// A single retrieval request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub queries: SearchQueries,
    pub routes: Vec<RetrievalRoute>,
    #[serde(default)]
    pub filters: SearchFilters,
    /// Per-source result cap
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// The user's original natural-language question
    pub user_query: String,
}

impl SearchRequest {
    pub fn new(
        queries: SearchQueries,
        routes: Vec<RetrievalRoute>,
        user_query: impl Into<String>,
    ) -> Self {
        Self {
            queries,
            routes,
            filters: SearchFilters::default(),
            top_k: default_top_k(),
            user_query: user_query.into(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Validate all request invariants
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        validate_search_request(self)
    }

    /// Ordered clauses of this request
    pub fn clauses(&self) -> Result<Vec<QueryClause>, RequestValidationError> {
        self.queries.to_clauses()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clause() {
        let clauses = SearchQueries::new("machine learning").to_clauses().unwrap();

        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].query, "machine learning");
        assert_eq!(clauses[0].search_field, SearchField::Total);
        assert!(clauses[0].operator.is_none());
    }

    #[test]
    fn test_three_clauses_in_order() {
        let queries = SearchQueries::new("deep learning")
            .with_field(SearchField::Title)
            .with_second(QueryOperator::Or, "neural networks", SearchField::Keyword)
            .with_third(QueryOperator::Not, "biology", SearchField::Subject);

        let clauses = queries.to_clauses().unwrap();

        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[1].operator, Some(QueryOperator::Or));
        assert_eq!(clauses[2].operator, Some(QueryOperator::Not));
        assert_eq!(clauses[2].search_field, SearchField::Subject);
    }

    #[test]
    fn test_gap_is_rejected() {
        let queries = SearchQueries {
            query_1: "history".to_string(),
            query_3: Some("korea".to_string()),
            search_field_3: Some(SearchField::Total),
            operator_2: Some(QueryOperator::And),
            ..Default::default()
        };

        assert_eq!(
            queries.to_clauses(),
            Err(RequestValidationError::MissingClause { position: 2 })
        );
    }

    #[test]
    fn test_second_clause_requires_operator() {
        let queries = SearchQueries {
            query_1: "history".to_string(),
            query_2: Some("korea".to_string()),
            search_field_2: Some(SearchField::Total),
            ..Default::default()
        };

        assert_eq!(
            queries.to_clauses(),
            Err(RequestValidationError::MissingOperator { position: 2 })
        );
    }

    #[test]
    fn test_second_clause_requires_field() {
        let queries = SearchQueries {
            query_1: "history".to_string(),
            query_2: Some("korea".to_string()),
            operator_1: Some(QueryOperator::And),
            ..Default::default()
        };

        assert_eq!(
            queries.to_clauses(),
            Err(RequestValidationError::MissingSearchField { position: 2 })
        );
    }

    #[test]
    fn test_dangling_operator_is_rejected() {
        let queries = SearchQueries {
            query_1: "history".to_string(),
            operator_1: Some(QueryOperator::Or),
            ..Default::default()
        };

        assert_eq!(
            queries.to_clauses(),
            Err(RequestValidationError::DanglingOperator { position: 2 })
        );
    }

    #[test]
    fn test_deserialize_upper_case_wire_values() {
        let json = r#"{
            "queries": {
                "query_1": "정치 철학",
                "search_field_1": "TITLE",
                "query_2": "롤스",
                "search_field_2": "AUTHOR",
                "operator_1": "AND"
            },
            "routes": ["library_holdings", "vector_index"],
            "user_query": "롤스의 정의론을 다룬 책"
        }"#;

        let request: SearchRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.top_k, 10);
        assert_eq!(request.queries.search_field_1, SearchField::Title);
        assert_eq!(request.queries.operator_1, Some(QueryOperator::And));
        assert_eq!(request.routes.len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_year_range_contains() {
        let range = YearRange::new(2000, 2010);
        assert!(range.contains(2000));
        assert!(range.contains(2010));
        assert!(!range.contains(1999));

        let open = YearRange {
            from_year: Some(2015),
            to_year: None,
        };
        assert!(open.contains(2024));
        assert!(!open.contains(2014));
    }

    #[test]
    fn test_route_display() {
        assert_eq!(RetrievalRoute::VectorIndex.to_string(), "vector_index");
        assert_eq!(
            serde_json::to_string(&RetrievalRoute::LibraryHoldings).unwrap(),
            "\"library_holdings\""
        );
    }
}
