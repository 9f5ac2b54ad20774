//! Quality filter and web-search escalation rule

use super::config::{CragConfig, RelevanceLabel};
use super::judgment::{JudgmentSummary, RelevanceJudgment};
use crate::domain::retrieval::RankedDocument;

/// Whether a judgment passes the quality gate
pub fn passes_quality(judgment: &RelevanceJudgment, relevance_threshold: f32) -> bool {
    match judgment.label {
        RelevanceLabel::Correct => true,
        RelevanceLabel::Ambiguous => judgment.confidence >= relevance_threshold,
        RelevanceLabel::Incorrect => false,
    }
}

/// Keep CORRECT documents and AMBIGUOUS ones at or above the threshold.
///
/// Surviving documents keep their original rank values.
pub fn filter_by_quality(
    judgments: &[RelevanceJudgment],
    relevance_threshold: f32,
) -> Vec<RankedDocument> {
    judgments
        .iter()
        .filter(|judgment| passes_quality(judgment, relevance_threshold))
        .map(|judgment| judgment.document.clone())
        .collect()
}

/// True when the INCORRECT share of all judgments is strictly above the threshold
pub fn needs_web_search(judgments: &[RelevanceJudgment], incorrect_ratio_threshold: f32) -> bool {
    JudgmentSummary::from_judgments(judgments).incorrect_ratio() > incorrect_ratio_threshold
}

/// Filter bound to a configuration
#[derive(Debug, Clone)]
pub struct CragFilter {
    config: CragConfig,
}

impl CragFilter {
    pub fn new(config: CragConfig) -> Self {
        Self { config }
    }

    pub fn filter(&self, judgments: &[RelevanceJudgment]) -> Vec<RankedDocument> {
        filter_by_quality(judgments, self.config.relevance_threshold)
    }

    pub fn needs_web_search(&self, judgments: &[RelevanceJudgment]) -> bool {
        needs_web_search(judgments, self.config.incorrect_ratio_threshold)
    }

    pub fn config(&self) -> &CragConfig {
        &self.config
    }
}
