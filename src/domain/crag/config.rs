//! CRAG configuration types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Three-valued relevance of a document to the user's question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelevanceLabel {
    /// Document directly answers the question
    Correct,
    /// Document is partially related
    Ambiguous,
    /// Document is unrelated or misleading
    Incorrect,
}

impl RelevanceLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "CORRECT",
            Self::Ambiguous => "AMBIGUOUS",
            Self::Incorrect => "INCORRECT",
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous)
    }

    pub fn is_incorrect(&self) -> bool {
        matches!(self, Self::Incorrect)
    }
}

impl std::fmt::Display for RelevanceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelevanceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CORRECT" => Ok(Self::Correct),
            "AMBIGUOUS" => Ok(Self::Ambiguous),
            "INCORRECT" => Ok(Self::Incorrect),
            other => Err(format!("Unknown relevance label: {}", other)),
        }
    }
}

/// Configuration for CRAG evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// Minimum confidence for an AMBIGUOUS document to be kept
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: f32,
    /// Escalate to web search when the INCORRECT share is strictly above this
    #[serde(default = "default_incorrect_ratio_threshold")]
    pub incorrect_ratio_threshold: f32,
    /// Judgment calls in flight at once
    #[serde(default = "default_max_concurrent_judgments")]
    pub max_concurrent_judgments: usize,
    #[serde(default = "default_judgment_timeout_secs")]
    pub judgment_timeout_secs: u64,
    /// Document content is truncated to this many characters before prompting
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Model used for judgments
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Custom evaluation prompt template
    /// Available variables: ${query}, ${document_content}
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation_prompt: Option<String>,
    /// Cached judgments; 0 disables the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_relevance_threshold() -> f32 {
    0.6
}

fn default_incorrect_ratio_threshold() -> f32 {
    0.7
}

fn default_max_concurrent_judgments() -> usize {
    4
}

fn default_judgment_timeout_secs() -> u64 {
    30
}

fn default_max_content_chars() -> usize {
    1000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_cache_capacity() -> u64 {
    1000
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: default_relevance_threshold(),
            incorrect_ratio_threshold: default_incorrect_ratio_threshold(),
            max_concurrent_judgments: default_max_concurrent_judgments(),
            judgment_timeout_secs: default_judgment_timeout_secs(),
            max_content_chars: default_max_content_chars(),
            model: default_model(),
            temperature: default_temperature(),
            evaluation_prompt: None,
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl CragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_relevance_threshold(mut self, threshold: f32) -> Self {
        self.relevance_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_incorrect_ratio_threshold(mut self, threshold: f32) -> Self {
        self.incorrect_ratio_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_concurrent_judgments(mut self, max: usize) -> Self {
        self.max_concurrent_judgments = max.max(1);
        self
    }

    pub fn with_judgment_timeout_secs(mut self, secs: u64) -> Self {
        self.judgment_timeout_secs = secs;
        self
    }

    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_evaluation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.evaluation_prompt = Some(prompt.into());
        self
    }

    pub fn with_cache(mut self, capacity: u64, ttl_secs: u64) -> Self {
        self.cache_capacity = capacity;
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// Get the default evaluation prompt
    pub fn default_evaluation_prompt() -> &'static str {
        r#"You are a document relevance evaluator.
Decide whether the document answers the user's question.

Question: ${query}

Document:
${document_content}

Classify the document as exactly one of:
- CORRECT: the document directly answers the question and is highly relevant
- AMBIGUOUS: the document is partially related but more information is needed
- INCORRECT: the document is unrelated to the question or misleading

Respond with ONLY a JSON object in this exact format:
{"relevance": "CORRECT" | "AMBIGUOUS" | "INCORRECT", "confidence": <number between 0.0 and 1.0>, "reason": "<one sentence>"}"#
    }

    /// Get the evaluation prompt to use
    pub fn get_evaluation_prompt(&self) -> &str {
        match &self.evaluation_prompt {
            Some(prompt) => prompt.as_str(),
            None => Self::default_evaluation_prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();

        assert_eq!(config.relevance_threshold, 0.6);
        assert_eq!(config.incorrect_ratio_threshold, 0.7);
        assert_eq!(config.max_concurrent_judgments, 4);
        assert_eq!(config.max_content_chars, 1000);
        assert!(config.evaluation_prompt.is_none());
    }

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("correct".parse::<RelevanceLabel>(), Ok(RelevanceLabel::Correct));
        assert_eq!(" Ambiguous ".parse::<RelevanceLabel>(), Ok(RelevanceLabel::Ambiguous));
        assert_eq!("INCORRECT".parse::<RelevanceLabel>(), Ok(RelevanceLabel::Incorrect));
        assert!("relevant".parse::<RelevanceLabel>().is_err());
    }

    #[test]
    fn test_label_serde() {
        assert_eq!(
            serde_json::to_string(&RelevanceLabel::Ambiguous).unwrap(),
            "\"AMBIGUOUS\""
        );
    }

    #[test]
    fn test_builder_pattern() {
        let config = CragConfig::new()
            .with_relevance_threshold(1.5)
            .with_incorrect_ratio_threshold(0.5)
            .with_max_concurrent_judgments(0)
            .with_model("claude-3-haiku")
            .with_cache(0, 60);

        assert_eq!(config.relevance_threshold, 1.0);
        assert_eq!(config.incorrect_ratio_threshold, 0.5);
        assert_eq!(config.max_concurrent_judgments, 1);
        assert_eq!(config.model, "claude-3-haiku");
        assert_eq!(config.cache_capacity, 0);
    }

    #[test]
    fn test_default_evaluation_prompt() {
        let config = CragConfig::default();

        assert!(config.get_evaluation_prompt().contains("${query}"));
        assert!(config.get_evaluation_prompt().contains("${document_content}"));
    }
}
