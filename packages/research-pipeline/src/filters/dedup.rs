//! Within-run deduplication.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::types::hit::SearchHit;

/// Fingerprint of a title with case and non-word characters removed.
///
/// Titles differing only in punctuation, whitespace or case share a
/// fingerprint.
pub fn title_fingerprint(title: &str) -> String {
    let normalized: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();

    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Remove repeated URLs and near-identical titles, keeping first occurrences.
pub fn deduplicate(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let before = hits.len();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut unique = Vec::with_capacity(hits.len());

    for hit in hits {
        if seen_urls.contains(&hit.url) {
            tracing::debug!(url = %hit.url, "Duplicate URL");
            continue;
        }

        let fingerprint = title_fingerprint(&hit.title);
        if seen_titles.contains(&fingerprint) {
            tracing::debug!(title = %hit.title, "Duplicate title");
            continue;
        }

        seen_urls.insert(hit.url.clone());
        seen_titles.insert(fingerprint);
        unique.push(hit);
    }

    tracing::info!(before, after = unique.len(), "Deduplication");
    unique
}
