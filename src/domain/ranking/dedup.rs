//! Content-fingerprint deduplication

use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::domain::retrieval::Document;

/// Fingerprint of lower-cased, whitespace-collapsed content
pub fn content_fingerprint(content: &str) -> String {
    let normalized = content
        .split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Collapse documents sharing a fingerprint, keeping the higher native score.
///
/// The survivor takes the slot of the first occurrence, so output order
/// follows first appearance in the input.
pub fn deduplicate(documents: Vec<Document>) -> Vec<Document> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(documents.len());
    let mut unique: Vec<Document> = Vec::with_capacity(documents.len());

    for document in documents {
        let fingerprint = content_fingerprint(&document.content);
        match slots.get(&fingerprint) {
            Some(&slot) => {
                if document.score > unique[slot].score {
                    unique[slot] = document;
                }
            }
            None => {
                slots.insert(fingerprint, unique.len());
                unique.push(document);
            }
        }
    }

    unique
}
