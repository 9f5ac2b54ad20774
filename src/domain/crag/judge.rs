//! Relevance judge trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::judgment::JudgmentOutcome;
use crate::domain::DomainError;

/// Single-call relevance judgment: question and content in, structured label out
#[async_trait]
pub trait RelevanceJudge: Send + Sync + Debug {
    /// Judge how well `content` answers `question`
    async fn judge(&self, question: &str, content: &str) -> Result<JudgmentOutcome, DomainError>;

    /// Get the judge name
    fn judge_name(&self) -> &'static str;
}
