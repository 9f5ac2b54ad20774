//! Refiner - corrective relevance judgment over ranked documents

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::crag::{
    CragConfig, CragFilter, JudgmentSummary, RelevanceJudge, RelevanceJudgment, RelevanceLabel,
};
use crate::domain::retrieval::RankedDocument;
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_judgment, JudgmentStatus};

/// Judgments, surviving documents and the escalation decision
#[derive(Debug, Clone)]
pub struct RefinementOutcome {
    /// One judgment per input document, in input order
    pub judgments: Vec<RelevanceJudgment>,
    /// Documents passing the quality filter, ranks unchanged
    pub documents: Vec<RankedDocument>,
    pub summary: JudgmentSummary,
    pub needs_web_search: bool,
}

/// Judges ranked documents and applies the quality gate
#[derive(Debug)]
pub struct Refiner {
    judge: Arc<dyn RelevanceJudge>,
    filter: CragFilter,
    judgment_timeout: Duration,
}

impl Refiner {
    pub fn new(judge: Arc<dyn RelevanceJudge>, config: CragConfig) -> Self {
        let judgment_timeout = Duration::from_secs(config.judgment_timeout_secs);
        Self {
            judge,
            filter: CragFilter::new(config),
            judgment_timeout,
        }
    }

    /// Override the per-judgment timeout
    pub fn with_judgment_timeout(mut self, timeout: Duration) -> Self {
        self.judgment_timeout = timeout;
        self
    }

    pub fn config(&self) -> &CragConfig {
        self.filter.config()
    }

    /// Judge every document against the user's question.
    ///
    /// At most `max_concurrent_judgments` calls are in flight; output order
    /// matches input order. A failed or timed-out call yields an AMBIGUOUS
    /// judgment with zero confidence.
    pub async fn evaluate_relevance(
        &self,
        question: &str,
        documents: Vec<RankedDocument>,
    ) -> Vec<RelevanceJudgment> {
        let concurrency = self.config().max_concurrent_judgments.max(1);

        stream::iter(documents)
            .map(|document| self.judge_document(question, document))
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await
    }

    /// Documents passing the quality gate
    pub fn filter_by_quality(&self, judgments: &[RelevanceJudgment]) -> Vec<RankedDocument> {
        self.filter.filter(judgments)
    }

    /// Whether the INCORRECT share calls for external search
    pub fn needs_web_search(&self, judgments: &[RelevanceJudgment]) -> bool {
        self.filter.needs_web_search(judgments)
    }

    /// Evaluate, filter and decide escalation in one pass
    pub async fn refine(&self, question: &str, documents: Vec<RankedDocument>) -> RefinementOutcome {
        let judgments = self.evaluate_relevance(question, documents).await;
        let documents = self.filter_by_quality(&judgments);
        let needs_web_search = self.needs_web_search(&judgments);
        let summary = JudgmentSummary::from_judgments(&judgments);

        info!(
            judged = summary.total,
            correct = summary.correct,
            ambiguous = summary.ambiguous,
            incorrect = summary.incorrect,
            failed = summary.failed,
            kept = documents.len(),
            needs_web_search = needs_web_search,
            "Refinement complete"
        );

        RefinementOutcome {
            judgments,
            documents,
            summary,
            needs_web_search,
        }
    }

    async fn judge_document(&self, question: &str, document: RankedDocument) -> RelevanceJudgment {
        let result = match tokio::time::timeout(
            self.judgment_timeout,
            self.judge.judge(question, &document.content),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::timeout(
                "relevance judgment",
                self.judgment_timeout.as_millis() as u64,
            )),
        };

        match result {
            Ok(outcome) => {
                record_judgment(outcome.label, JudgmentStatus::Judged);
                RelevanceJudgment::from_outcome(document, outcome)
            }
            Err(e) => {
                warn!(
                    judge = self.judge.judge_name(),
                    rank = document.rank,
                    error = %e,
                    "Relevance judgment failed, defaulting to AMBIGUOUS"
                );
                record_judgment(RelevanceLabel::Ambiguous, JudgmentStatus::Fallback);
                RelevanceJudgment::fallback(document, e.to_string())
            }
        }
    }
}
