//! Relevance judgments

use serde::{Deserialize, Serialize};

use super::config::RelevanceLabel;
use crate::domain::retrieval::RankedDocument;

/// Decoded output of one judgment call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentOutcome {
    pub label: RelevanceLabel,
    /// Confidence in [0, 1]
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl JudgmentOutcome {
    pub fn new(label: RelevanceLabel, confidence: f32) -> Self {
        Self {
            label,
            confidence,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// A ranked document paired with its relevance judgment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceJudgment {
    pub document: RankedDocument,
    pub label: RelevanceLabel,
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Why the judgment call failed, when this is a fallback judgment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl RelevanceJudgment {
    pub fn from_outcome(document: RankedDocument, outcome: JudgmentOutcome) -> Self {
        Self {
            document,
            label: outcome.label,
            confidence: outcome.confidence,
            reason: outcome.reason,
            failure: None,
        }
    }

    /// AMBIGUOUS with zero confidence, recording why the call failed
    pub fn fallback(document: RankedDocument, failure: impl Into<String>) -> Self {
        Self {
            document,
            label: RelevanceLabel::Ambiguous,
            confidence: 0.0,
            reason: None,
            failure: Some(failure.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Counts of judgments by label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgmentSummary {
    pub total: usize,
    pub correct: usize,
    pub ambiguous: usize,
    pub incorrect: usize,
    /// Fallback judgments; also counted under `ambiguous`
    pub failed: usize,
}

impl JudgmentSummary {
    pub fn from_judgments(judgments: &[RelevanceJudgment]) -> Self {
        let mut summary = Self {
            total: judgments.len(),
            ..Default::default()
        };

        for judgment in judgments {
            match judgment.label {
                RelevanceLabel::Correct => summary.correct += 1,
                RelevanceLabel::Ambiguous => summary.ambiguous += 1,
                RelevanceLabel::Incorrect => summary.incorrect += 1,
            }
            if judgment.is_failed() {
                summary.failed += 1;
            }
        }

        summary
    }

    /// Share of INCORRECT judgments; 0 for an empty set
    pub fn incorrect_ratio(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.incorrect as f32 / self.total as f32
    }
}
