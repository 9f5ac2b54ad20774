//! LLM-backed relevance judge
//!
//! Prompts a chat model with the user question and the document content and
//! decodes the `{relevance, confidence, reason}` object it replies with.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::crag::{CragConfig, JudgmentOutcome, RelevanceJudge, RelevanceLabel};
use crate::domain::llm::{LlmProvider, LlmRequest, LlmResponseFormat};
use crate::domain::DomainError;

const MAX_RESPONSE_TOKENS: u32 = 150;

/// Relevance judge that asks an LLM
#[derive(Debug)]
pub struct LlmRelevanceJudge {
    provider: Arc<dyn LlmProvider>,
    config: CragConfig,
}

impl LlmRelevanceJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, config: CragConfig) -> Self {
        Self { provider, config }
    }

    fn build_prompt(&self, question: &str, content: &str) -> String {
        let content = truncate_graphemes(content, self.config.max_content_chars);
        self.config
            .get_evaluation_prompt()
            .replace("${query}", question)
            .replace("${document_content}", &content)
    }
}

/// Response structure from the judgment model
#[derive(Debug, Deserialize)]
struct RawJudgment {
    relevance: String,
    confidence: f32,
    #[serde(default)]
    reason: Option<String>,
}

/// Keep at most `max` grapheme clusters
pub fn truncate_graphemes(text: &str, max: usize) -> String {
    text.graphemes(true).take(max).collect()
}

/// Extract JSON object from a string (handles prose and markdown code fences)
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Decode a model reply into a judgment outcome
pub fn parse_judgment(response: &str) -> Result<JudgmentOutcome, DomainError> {
    let json_str = extract_json(response).ok_or_else(|| {
        DomainError::provider("llm_judge", "No JSON object in judgment response")
    })?;

    let raw: RawJudgment = serde_json::from_str(json_str).map_err(|e| {
        DomainError::provider("llm_judge", format!("Invalid judgment response format: {}", e))
    })?;

    let label: RelevanceLabel = raw
        .relevance
        .parse()
        .map_err(|e: String| DomainError::provider("llm_judge", e))?;

    if !(0.0..=1.0).contains(&raw.confidence) {
        return Err(DomainError::provider(
            "llm_judge",
            format!("Confidence {} is outside [0, 1]", raw.confidence),
        ));
    }

    let mut outcome = JudgmentOutcome::new(label, raw.confidence);
    if let Some(reason) = raw.reason.filter(|r| !r.trim().is_empty()) {
        outcome = outcome.with_reason(reason);
    }

    Ok(outcome)
}

#[async_trait]
impl RelevanceJudge for LlmRelevanceJudge {
    async fn judge(&self, question: &str, content: &str) -> Result<JudgmentOutcome, DomainError> {
        let prompt = self.build_prompt(question, content);

        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(MAX_RESPONSE_TOKENS)
            .response_format(LlmResponseFormat::JsonObject)
            .build();

        let response = self.provider.chat(&self.config.model, request).await?;

        if response.content().trim().is_empty() {
            return Err(DomainError::provider("llm_judge", "Empty response from LLM"));
        }

        let outcome = parse_judgment(response.content()).inspect_err(|e| {
            warn!(error = %e, response = %response.content(), "Unparseable judgment response");
        })?;

        debug!(
            label = %outcome.label,
            confidence = outcome.confidence,
            "Document judged"
        );

        Ok(outcome)
    }

    fn judge_name(&self) -> &'static str {
        "llm"
    }
}
