//! Required-keyword gate.

use crate::types::hit::SearchHit;

/// Keep hits whose title or snippet contains at least one keyword.
///
/// Matching is a case-insensitive substring test. An empty keyword list
/// passes everything through.
pub fn filter_by_keywords(hits: Vec<SearchHit>, keywords: &[String]) -> Vec<SearchHit> {
    if keywords.is_empty() {
        return hits;
    }

    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    hits.into_iter()
        .filter(|hit| {
            let text = hit.searchable_text();
            let matched = keywords.iter().any(|k| text.contains(k.as_str()));
            if !matched {
                tracing::debug!(title = %hit.title, "Filtered by keywords");
            }
            matched
        })
        .collect()
}
