//! Token-overlap relevance model used when no cross-encoder is configured

use std::collections::HashSet;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::ranking::RelevanceModel;
use crate::domain::DomainError;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

fn tokens(text: &str) -> HashSet<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Scores a text by the share of distinct query tokens it contains
#[derive(Debug, Default, Clone)]
pub struct LexicalOverlapModel;

impl LexicalOverlapModel {
    pub fn new() -> Self {
        Self
    }

    /// Overlap score in [0, 1]; 0 for a query without tokens
    pub fn overlap(query_tokens: &HashSet<String>, text: &str) -> f32 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let text_tokens = tokens(text);
        let matched = query_tokens
            .iter()
            .filter(|token| text_tokens.contains(*token))
            .count();

        matched as f32 / query_tokens.len() as f32
    }
}

#[async_trait]
impl RelevanceModel for LexicalOverlapModel {
    async fn score(&self, query: &str, texts: &[String]) -> Result<Vec<f32>, DomainError> {
        let query_tokens = tokens(query);
        Ok(texts
            .iter()
            .map(|text| Self::overlap(&query_tokens, text))
            .collect())
    }

    fn model_name(&self) -> &str {
        "lexical_overlap"
    }
}
