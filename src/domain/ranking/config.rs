//! Ranking configuration types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::retrieval::RetrievalRoute;

/// Strategy used to combine per-document scores into one ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// Reciprocal rank fusion over native source ranks
    #[default]
    Rrf,
    /// Rerank score scaled by a per-source weight
    Weighted,
    /// Rerank score unmodified
    CrossEncoder,
}

impl FusionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rrf => "rrf",
            Self::Weighted => "weighted",
            Self::CrossEncoder => "cross_encoder",
        }
    }
}

impl std::fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for the ranker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerConfig {
    #[serde(default)]
    pub fusion_method: FusionMethod,
    /// RRF smoothing constant
    #[serde(default = "default_rrf_k")]
    pub rrf_k: f32,
    /// Maximum number of ranked documents kept
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Weights used by weighted fusion
    #[serde(default = "default_source_weights")]
    pub source_weights: HashMap<RetrievalRoute, f32>,
    /// Weight of sources missing from `source_weights`
    #[serde(default = "default_weight")]
    pub default_weight: f32,
}

fn default_rrf_k() -> f32 {
    60.0
}

fn default_top_k() -> usize {
    20
}

fn default_source_weights() -> HashMap<RetrievalRoute, f32> {
    HashMap::from([
        (RetrievalRoute::VectorIndex, 0.6),
        (RetrievalRoute::LibraryHoldings, 0.4),
        (RetrievalRoute::ElectronicResources, 0.4),
    ])
}

fn default_weight() -> f32 {
    0.5
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            fusion_method: FusionMethod::default(),
            rrf_k: default_rrf_k(),
            top_k: default_top_k(),
            source_weights: default_source_weights(),
            default_weight: default_weight(),
        }
    }
}

impl RankerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fusion_method(mut self, method: FusionMethod) -> Self {
        self.fusion_method = method;
        self
    }

    pub fn with_rrf_k(mut self, k: f32) -> Self {
        self.rrf_k = k.max(0.0);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_source_weight(mut self, route: RetrievalRoute, weight: f32) -> Self {
        self.source_weights.insert(route, weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f32) -> Self {
        self.default_weight = weight;
        self
    }

    /// Weight applied to documents from `source`
    pub fn weight_for(&self, source: Option<RetrievalRoute>) -> f32 {
        source
            .and_then(|route| self.source_weights.get(&route).copied())
            .unwrap_or(self.default_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RankerConfig::default();

        assert_eq!(config.fusion_method, FusionMethod::Rrf);
        assert_eq!(config.rrf_k, 60.0);
        assert_eq!(config.top_k, 20);
        assert_eq!(config.weight_for(Some(RetrievalRoute::VectorIndex)), 0.6);
        assert_eq!(config.weight_for(Some(RetrievalRoute::LibraryHoldings)), 0.4);
        assert_eq!(config.weight_for(None), 0.5);
    }

    #[test]
    fn test_unlisted_source_gets_default_weight() {
        let mut config = RankerConfig::default().with_default_weight(0.3);
        config.source_weights.remove(&RetrievalRoute::ElectronicResources);

        assert_eq!(
            config.weight_for(Some(RetrievalRoute::ElectronicResources)),
            0.3
        );
    }

    #[test]
    fn test_deserialize_with_partial_fields() {
        let config: RankerConfig =
            serde_json::from_str(r#"{"fusion_method": "weighted", "top_k": 5}"#).unwrap();

        assert_eq!(config.fusion_method, FusionMethod::Weighted);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.rrf_k, 60.0);
        assert_eq!(config.source_weights.len(), 3);
    }
}
