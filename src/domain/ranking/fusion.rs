//! Fusion strategies
//!
//! Each strategy sets `fused_score` on every document; [`fuse`] then sorts,
//! assigns ranks and truncates.

use std::collections::HashMap;

use super::config::{FusionMethod, RankerConfig};
use super::dedup::content_fingerprint;
use crate::domain::retrieval::RankedDocument;

/// RRF contribution of a document at 1-based native rank `rank`
pub fn rrf_contribution(rank: usize, k: f32) -> f32 {
    1.0 / (k + rank as f32)
}

/// Sum `1/(k + source_rank)` over every occurrence of the same content.
///
/// Documents without a native rank use their 1-based input position.
pub fn reciprocal_rank_fusion(documents: &mut [RankedDocument], k: f32) {
    let fingerprints: Vec<String> = documents
        .iter()
        .map(|doc| content_fingerprint(&doc.content))
        .collect();

    let mut totals: HashMap<&str, f32> = HashMap::with_capacity(documents.len());
    for (position, (doc, fingerprint)) in documents.iter().zip(&fingerprints).enumerate() {
        let rank = if doc.source_rank > 0 {
            doc.source_rank
        } else {
            position + 1
        };
        *totals.entry(fingerprint.as_str()).or_insert(0.0) += rrf_contribution(rank, k);
    }

    for (doc, fingerprint) in documents.iter_mut().zip(&fingerprints) {
        doc.fused_score = totals.get(fingerprint.as_str()).copied().unwrap_or(0.0);
    }
}

/// `fused_score = rerank_score * source_weight`
pub fn weighted_fusion(documents: &mut [RankedDocument], config: &RankerConfig) {
    for doc in documents.iter_mut() {
        doc.fused_score = doc.rerank_score * config.weight_for(doc.source);
    }
}

/// `fused_score = rerank_score`
pub fn cross_encoder_only(documents: &mut [RankedDocument]) {
    for doc in documents.iter_mut() {
        doc.fused_score = doc.rerank_score;
    }
}

/// Stable sort by descending `fused_score`, assign 1-based ranks, keep `top_k`
pub fn rank_and_truncate(mut documents: Vec<RankedDocument>, top_k: usize) -> Vec<RankedDocument> {
    documents.sort_by(|a, b| b.fused_score.total_cmp(&a.fused_score));
    documents.truncate(top_k);

    for (index, doc) in documents.iter_mut().enumerate() {
        doc.rank = index + 1;
    }

    documents
}

/// Apply the configured strategy and produce the final ranking
pub fn fuse(mut documents: Vec<RankedDocument>, config: &RankerConfig) -> Vec<RankedDocument> {
    match config.fusion_method {
        FusionMethod::Rrf => reciprocal_rank_fusion(&mut documents, config.rrf_k),
        FusionMethod::Weighted => weighted_fusion(&mut documents, config),
        FusionMethod::CrossEncoder => cross_encoder_only(&mut documents),
    }

    rank_and_truncate(documents, config.top_k)
}
