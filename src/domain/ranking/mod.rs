//! Ranking domain
//!
//! Deduplication, pairwise relevance scoring and the closed set of fusion
//! strategies that turn concatenated source results into one ordering.

mod config;
mod dedup;
mod fusion;
mod model;

pub use config::{FusionMethod, RankerConfig};
pub use dedup::{content_fingerprint, deduplicate};
pub use fusion::{
    cross_encoder_only, fuse, rank_and_truncate, reciprocal_rank_fusion, rrf_contribution,
    weighted_fusion,
};
pub use model::RelevanceModel;

#[cfg(test)]
pub use model::mock::MockRelevanceModel;
