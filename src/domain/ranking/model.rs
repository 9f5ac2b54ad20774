//! Pairwise relevance model trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Cross-encoder style scorer of (query, text) pairs
#[async_trait]
pub trait RelevanceModel: Send + Sync + Debug {
    /// Score each text against the query; output is aligned with `texts`
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError>;

    fn model_name(&self) -> &str;
}
