//! Branch execution shared by the catalog adapters

use std::collections::HashMap;

use futures::future::join_all;
use tracing::warn;

use super::catalog_backend::{
    CatalogBackend, CatalogBackendRequest, CatalogCollection, CatalogRecord,
};
use crate::domain::source::CatalogSearchParams;
use crate::domain::DomainError;

/// Score of a record at 0-based position `rank` when the catalog only gives an order
pub fn rank_score(rank: usize) -> f32 {
    1.0 / (rank as f32 + 1.0)
}

/// Run one backend search per branch and merge hits by record id.
///
/// A record found by several branches keeps its best score. The merged list
/// is ordered by score, first appearance breaking ties, and capped at
/// `top_k`. Fails only when every branch fails.
pub async fn search_branches(
    backend: &dyn CatalogBackend,
    collection: CatalogCollection,
    params: &CatalogSearchParams,
    top_k: usize,
) -> Result<Vec<(CatalogRecord, f32)>, DomainError> {
    if params.branches.is_empty() {
        return Ok(Vec::new());
    }

    let requests: Vec<CatalogBackendRequest> = params
        .branches
        .iter()
        .map(|branch| CatalogBackendRequest {
            collection,
            query: branch.clone(),
            exclusions: params.exclusions.clone(),
            year_range: params.year_range,
            material_types: params.material_types.clone(),
            academic_journals_only: params.academic_journals_only,
            foreign_language: params.foreign_language,
            limit: top_k,
        })
        .collect();

    let outcomes = join_all(requests.iter().map(|request| backend.search(request))).await;

    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<(CatalogRecord, f32)> = Vec::new();
    let mut last_error = None;
    let mut succeeded = 0;

    for (branch, outcome) in params.branches.iter().zip(outcomes) {
        let records = match outcome {
            Ok(records) => {
                succeeded += 1;
                records
            }
            Err(e) => {
                warn!(
                    collection = collection.as_str(),
                    branch = %branch.query,
                    error = %e,
                    "Catalog branch search failed"
                );
                last_error = Some(e);
                continue;
            }
        };

        for (rank, record) in records.into_iter().take(top_k).enumerate() {
            let score = rank_score(rank);
            match slots.get(&record.id) {
                Some(&slot) => {
                    if score > merged[slot].1 {
                        merged[slot].1 = score;
                    }
                }
                None => {
                    slots.insert(record.id.clone(), merged.len());
                    merged.push((record, score));
                }
            }
        }
    }

    if succeeded == 0 {
        if let Some(error) = last_error {
            return Err(error);
        }
    }

    merged.sort_by(|a, b| b.1.total_cmp(&a.1));
    merged.truncate(top_k);

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::retrieval::{QueryClause, QueryOperator, SearchField, SearchFilters};
    use crate::infrastructure::sources::catalog_backend::MockCatalogBackend;

    fn record(id: &str) -> CatalogRecord {
        CatalogRecord {
            id: id.to_string(),
            title: format!("Title {}", id),
            ..Default::default()
        }
    }

    fn or_params() -> CatalogSearchParams {
        CatalogSearchParams::from_clauses(
            &[
                QueryClause::first("rawls", SearchField::Author),
                QueryClause::combined(QueryOperator::Or, "justice", SearchField::Subject),
            ],
            &SearchFilters::default(),
        )
    }

    #[test]
    fn test_rank_score() {
        assert_eq!(rank_score(0), 1.0);
        assert_eq!(rank_score(1), 0.5);
        assert!(rank_score(2) < rank_score(1));
    }

    #[tokio::test]
    async fn test_branches_merged_by_id() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_search().times(2).returning(|request| {
            if request.query.query == "rawls" {
                Ok(vec![record("a"), record("b")])
            } else {
                Ok(vec![record("b"), record("c")])
            }
        });

        let merged = search_branches(&backend, CatalogCollection::Holdings, &or_params(), 10)
            .await
            .unwrap();

        let ids: Vec<&str> = merged.iter().map(|(r, _)| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(merged[1].1, 1.0);
        assert_eq!(merged[2].1, 0.5);
    }

    #[tokio::test]
    async fn test_partial_branch_failure_keeps_other_hits() {
        let mut backend = MockCatalogBackend::new();
        backend.expect_search().returning(|request| {
            if request.query.query == "rawls" {
                Err(DomainError::source("holdings", "session expired"))
            } else {
                Ok(vec![record("c")])
            }
        });

        let merged = search_branches(&backend, CatalogCollection::Holdings, &or_params(), 10)
            .await
            .unwrap();

        assert_eq!(merged.len(), 1);
    }

    #[tokio::test]
    async fn test_all_branches_failing_is_an_error() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_search()
            .returning(|_| Err(DomainError::source("holdings", "login failed")));

        let result =
            search_branches(&backend, CatalogCollection::Holdings, &or_params(), 10).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_truncates_to_top_k() {
        let mut backend = MockCatalogBackend::new();
        backend
            .expect_search()
            .returning(|_| Ok((0..10).map(|i| record(&i.to_string())).collect()));

        let merged = search_branches(&backend, CatalogCollection::Electronic, &or_params(), 3)
            .await
            .unwrap();

        assert_eq!(merged.len(), 3);
    }
}
