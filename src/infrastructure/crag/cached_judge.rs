//! Memoising decorator for relevance judges

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::domain::crag::{JudgmentOutcome, RelevanceJudge};
use crate::domain::ranking::content_fingerprint;
use crate::domain::DomainError;

/// Caches successful judgments keyed by question and content fingerprint.
/// Failed calls are never cached.
#[derive(Debug)]
pub struct CachedRelevanceJudge {
    inner: Arc<dyn RelevanceJudge>,
    cache: Cache<(String, String), JudgmentOutcome>,
}

impl CachedRelevanceJudge {
    pub fn new(inner: Arc<dyn RelevanceJudge>, capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    fn cache_key(question: &str, content: &str) -> (String, String) {
        (question.trim().to_string(), content_fingerprint(content))
    }
}

#[async_trait]
impl RelevanceJudge for CachedRelevanceJudge {
    async fn judge(&self, question: &str, content: &str) -> Result<JudgmentOutcome, DomainError> {
        let key = Self::cache_key(question, content);

        if let Some(outcome) = self.cache.get(&key).await {
            debug!("Judgment cache hit");
            return Ok(outcome);
        }

        let outcome = self.inner.judge(question, content).await?;
        self.cache.insert(key, outcome.clone()).await;

        Ok(outcome)
    }

    fn judge_name(&self) -> &'static str {
        self.inner.judge_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crag::{MockRelevanceJudge, RelevanceLabel};

    fn cached(inner: Arc<MockRelevanceJudge>) -> CachedRelevanceJudge {
        CachedRelevanceJudge::new(inner, 100, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_repeated_judgment_is_cached() {
        let inner = Arc::new(MockRelevanceJudge::new().with_outcome(
            "doc",
            RelevanceLabel::Incorrect,
            0.7,
        ));
        let judge = cached(inner.clone());

        let first = judge.judge("question", "doc").await.unwrap();
        let second = judge.judge("question", "doc").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.label, RelevanceLabel::Incorrect);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn test_different_question_misses() {
        let inner = Arc::new(MockRelevanceJudge::new());
        let judge = cached(inner.clone());

        judge.judge("first question", "doc").await.unwrap();
        judge.judge("second question", "doc").await.unwrap();

        assert_eq!(inner.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let inner = Arc::new(MockRelevanceJudge::new().with_failure("doc", "timeout"));
        let judge = cached(inner.clone());

        assert!(judge.judge("question", "doc").await.is_err());
        assert!(judge.judge("question", "doc").await.is_err());
        assert_eq!(inner.calls(), 2);
    }
}
